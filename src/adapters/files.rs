use crate::adapters::identity::IdentityClient;
use crate::config::FileStoreConfig;
use crate::domain::ports::TemplateStore;
use crate::utils::error::{DocGenError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::LOCATION;
use reqwest::Client;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Graph-style drive client hosting the trip order template. Every call
/// carries a bearer token freshly acquired from the identity client.
pub struct GraphDriveClient {
    client: Client,
    identity: IdentityClient,
    base_url: String,
    drive_id: String,
    template_file_id: String,
    target_folder_id: String,
}

impl GraphDriveClient {
    pub fn new(config: &FileStoreConfig, identity: IdentityClient) -> Self {
        Self {
            client: Client::new(),
            identity,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            drive_id: config.drive_id.clone(),
            template_file_id: config.template_file_id.clone(),
            target_folder_id: config.target_folder_id.clone(),
        }
    }

    fn item_url(&self, file_id: &str, suffix: &str) -> String {
        format!(
            "{}/drives/{}/items/{}{}",
            self.base_url, self.drive_id, file_id, suffix
        )
    }

    async fn expect_success(
        response: reqwest::Response,
        context: &'static str,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(DocGenError::UpstreamStatus {
                service: context,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response)
    }
}

/// The copy operation answers 202 with a monitor URL in `Location`; the
/// new item id sits in its `items/<id>?` segment.
fn file_id_from_location(location: &str) -> Option<String> {
    let re = Regex::new(r"items/([^/?]+)\?").ok()?;
    re.captures(location)
        .map(|caps| caps[1].to_string())
}

#[async_trait]
impl TemplateStore for GraphDriveClient {
    async fn copy_template(&self, new_name: &str) -> Result<String> {
        let token = self.identity.acquire_token().await?;
        let url = self.item_url(&self.template_file_id, "/copy");
        tracing::debug!("POST {}", url);

        let body = serde_json::json!({
            "parentReference": {
                "driveId": self.drive_id,
                "id": self.target_folder_id,
            },
            "name": new_name,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        let response = Self::expect_success(response, "file store copy").await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| DocGenError::FileStore {
                message: "copy response carries no Location header".to_string(),
            })?;

        file_id_from_location(location).ok_or_else(|| DocGenError::FileStore {
            message: format!("no item id in copy monitor URL {:?}", location),
        })
    }

    async fn fetch_content(&self, file_id: &str) -> Result<Vec<u8>> {
        let token = self.identity.acquire_token().await?;
        let url = self.item_url(file_id, "/content");
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).bearer_auth(&token).send().await?;
        let response = Self::expect_success(response, "file store fetch").await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn put_content(&self, file_id: &str, content: Vec<u8>) -> Result<()> {
        let token = self.identity.acquire_token().await?;
        let url = self.item_url(file_id, "/content");
        tracing::debug!("PUT {} ({} bytes)", url, content.len());

        let response = self
            .client
            .put(&url)
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, DOCX_MIME)
            .body(content)
            .send()
            .await?;
        Self::expect_success(response, "file store upload").await?;
        Ok(())
    }

    async fn export_pdf(&self, file_id: &str) -> Result<Vec<u8>> {
        let token = self.identity.acquire_token().await?;
        let url = self.item_url(file_id, "/content?format=pdf");
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).bearer_auth(&token).send().await?;
        let response = Self::expect_success(response, "file store export").await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_from_monitor_url() {
        let url = "https://host/v1.0/drives/d1/items/NEW123?monitor=abc";
        assert_eq!(file_id_from_location(url), Some("NEW123".to_string()));
    }

    #[test]
    fn test_file_id_missing_from_url() {
        assert_eq!(file_id_from_location("https://host/v1.0/operations/1"), None);
        assert_eq!(file_id_from_location("https://host/items/NEW123"), None);
    }
}

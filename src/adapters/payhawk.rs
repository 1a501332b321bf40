use crate::config::PayhawkConfig;
use crate::domain::model::{ExpenseRecord, WorkflowRecord};
use crate::domain::ports::{EmployeeDirectory, ExpenseApi};
use crate::utils::error::{DocGenError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const API_KEY_HEADER: &str = "X-Payhawk-ApiKey";

/// Expense-management API client, authenticated with a static API key
/// header. All paths are relative to the per-account base URL.
pub struct PayhawkClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PayhawkClient {
    pub fn new(config: &PayhawkConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: format!(
                "{}/accounts/{}",
                config.api_base_url.trim_end_matches('/'),
                config.account_id
            ),
            api_key: config.api_key.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocGenError::UpstreamStatus {
                service: "payhawk",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReimbursementDetails {
    account_holder: String,
}

#[async_trait]
impl ExpenseApi for PayhawkClient {
    async fn get_expense(&self, expense_id: u64) -> Result<ExpenseRecord> {
        self.get_json(&format!("expenses/{}", expense_id)).await
    }

    async fn get_workflow(&self, expense_id: u64) -> Result<WorkflowRecord> {
        self.get_json(&format!("expenses/{}/workflow", expense_id))
            .await
    }

    async fn upload_document(&self, expense_id: u64, file_name: &str, pdf: Vec<u8>) -> Result<()> {
        let url = format!("{}/expenses/{}/files", self.base_url, expense_id);
        tracing::debug!("POST {} ({} bytes)", url, pdf.len());

        let part = reqwest::multipart::Part::bytes(pdf)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocGenError::UpstreamStatus {
                service: "payhawk",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl EmployeeDirectory for PayhawkClient {
    /// Display name as entered in the employee's reimbursement details
    /// (the Cyrillic form the order template needs).
    async fn display_name(&self, employee_id: &str) -> Result<String> {
        let details: ReimbursementDetails = self
            .get_json(&format!("users/{}/reimbursement-details", employee_id))
            .await
            .map_err(|e| DocGenError::ResolutionFailed {
                employee_id: employee_id.to_string(),
                message: e.to_string(),
            })?;
        Ok(details.account_holder)
    }
}

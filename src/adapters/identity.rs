use crate::config::IdentityConfig;
use crate::utils::error::{DocGenError, Result};
use reqwest::Client;
use serde::Deserialize;

/// OAuth2 client-credentials flow against the configured token endpoint.
/// Tokens are not cached; each caller acquires a fresh one.
pub struct IdentityClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl IdentityClient {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            client: Client::new(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        }
    }

    pub async fn acquire_token(&self) -> Result<String> {
        tracing::debug!("POST {}", self.token_url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocGenError::Auth {
                message: format!(
                    "token endpoint returned HTTP {}: {}",
                    status.as_u16(),
                    response.text().await.unwrap_or_default()
                ),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

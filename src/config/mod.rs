use crate::utils::error::{DocGenError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use clap::Parser;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Parser)]
#[command(name = "perdiem-docgen")]
#[command(about = "Generates business-trip order forms for reviewed per-diem expenses")]
pub struct Cli {
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Process-wide configuration, loaded once at startup and passed by
/// reference into every collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub payhawk: PayhawkConfig,
    pub files: FileStoreConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub custom_fields: CustomFieldIds,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayhawkConfig {
    #[serde(default = "default_payhawk_base")]
    pub api_base_url: String,
    pub account_id: String,
    pub api_key: String,
}

fn default_payhawk_base() -> String {
    "https://api.payhawk.com/api/v3".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileStoreConfig {
    #[serde(default = "default_graph_base")]
    pub graph_base_url: String,
    pub drive_id: String,
    pub template_file_id: String,
    pub target_folder_id: String,
}

fn default_graph_base() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

/// Expense custom-field ids, mapped to the template field category they
/// feed. Ids differ per account, so they are configuration, not code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomFieldIds {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub transport: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Team,
    Title,
    Reason,
    Transport,
}

impl CustomFieldIds {
    /// Looks up which template category a custom-field id feeds.
    /// An unset (empty) category id never matches.
    pub fn category(&self, field_id: &str) -> Option<FieldCategory> {
        if field_id.is_empty() {
            return None;
        }
        if field_id == self.team {
            Some(FieldCategory::Team)
        } else if field_id == self.title {
            Some(FieldCategory::Title)
        } else if field_id == self.reason {
            Some(FieldCategory::Reason)
        } else if field_id == self.transport {
            Some(FieldCategory::Transport)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub regenerate_if_exists: bool,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DocGenError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DocGenError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` references with the environment variable's
    /// value, leaving unresolved references in place.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DocGenError::Config {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("payhawk.api_base_url", &self.payhawk.api_base_url)?;
        validate_non_empty_string("payhawk.account_id", &self.payhawk.account_id)?;
        validate_non_empty_string("payhawk.api_key", &self.payhawk.api_key)?;

        validate_url("files.graph_base_url", &self.files.graph_base_url)?;
        validate_non_empty_string("files.drive_id", &self.files.drive_id)?;
        validate_non_empty_string("files.template_file_id", &self.files.template_file_id)?;
        validate_non_empty_string("files.target_folder_id", &self.files.target_folder_id)?;

        validate_url("identity.token_url", &self.identity.token_url)?;
        validate_non_empty_string("identity.client_id", &self.identity.client_id)?;
        validate_non_empty_string("identity.client_secret", &self.identity.client_secret)?;

        Ok(())
    }
}

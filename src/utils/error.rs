use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocGenError {
    #[error("API request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Template archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed expense data: {message}")]
    MalformedInput { message: String },

    #[error("Could not resolve employee {employee_id}: {message}")]
    ResolutionFailed {
        employee_id: String,
        message: String,
    },

    #[error("File store error: {message}")]
    FileStore { message: String },

    #[error("Token acquisition failed: {message}")]
    Auth { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DocGenError>;

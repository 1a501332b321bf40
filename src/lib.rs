pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::config::AppConfig;
pub use crate::core::extractor::FieldExtractor;
pub use crate::core::generator::{DocumentGenerator, GenerationOutcome};
pub use crate::utils::error::{DocGenError, Result};

//! Error types for the Parser

use thiserror::Error;

/// Errors that can occur while building or running the Parser
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A strategy or fallback heuristic failed internally
    #[error("Strategy '{name}' failed: {message}")]
    Strategy {
        /// Strategy name
        name: String,
        /// What went wrong
        message: String,
    },

    /// Parse did not finish in time
    #[error("Parse timeout")]
    Timeout,

    /// Blocking parse task could not be joined
    #[error("Parse task failed: {0}")]
    Task(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),
}

impl ExtractorError {
    /// Build a strategy failure
    pub fn strategy(name: &str, message: impl Into<String>) -> Self {
        ExtractorError::Strategy {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Json(e.to_string())
    }
}

impl From<dossier_store::StoreError> for ExtractorError {
    fn from(e: dossier_store::StoreError) -> Self {
        match e {
            dossier_store::StoreError::Config(msg) => ExtractorError::Config(msg),
        }
    }
}

impl From<dossier_gatekeeper::GatekeeperError> for ExtractorError {
    fn from(e: dossier_gatekeeper::GatekeeperError) -> Self {
        match e {
            dossier_gatekeeper::GatekeeperError::Config(msg) => ExtractorError::Config(msg),
        }
    }
}

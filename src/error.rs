//! Unified error type for hookgate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookGateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid hook event: {0}")]
    InvalidEvent(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HookGateError>;

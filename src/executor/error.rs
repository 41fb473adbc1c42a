// Error types for Executor module

use crate::executor::types::Capability;
use std::path::PathBuf;
use thiserror::Error;

/// Executor error types
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input for tool '{0}': {1}")]
    InvalidInput(String, String),

    #[error("Tool '{tool}' requires the {capability} capability")]
    CapabilityDenied { tool: String, capability: Capability },

    #[error("Path outside sandbox: {}", .0.display())]
    PathEscape(PathBuf),

    #[error("Dangerous command blocked: {0}")]
    DeniedCommand(String),

    #[error("Content too short for source file '{0}': provide the complete file content")]
    ContentTooShort(String),

    #[error("Execution timeout for tool '{0}' after {1} seconds")]
    Timeout(String, u64),

    #[error("Failed to spawn process for tool '{0}': {1}")]
    SpawnFailed(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ExecutorError>;

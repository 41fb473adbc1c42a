// Executor configuration

use crate::executor::types::{CapabilityFlags, ExecutionConstraints};
use std::path::PathBuf;

/// Executor configuration
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Root directory outside of which file operations are forbidden
    pub sandbox_root: PathBuf,
    /// Process-wide capability flags
    pub capabilities: CapabilityFlags,
    /// Default execution constraints
    pub constraints: ExecutionConstraints,
    /// Shell path for command execution
    pub shell: String,
    /// Path to apps.toml application alias file
    pub apps_toml_path: PathBuf,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            sandbox_root: PathBuf::from("."),
            capabilities: CapabilityFlags::default(),
            constraints: ExecutionConstraints::default(),
            shell: String::from("/bin/sh"),
            apps_toml_path: PathBuf::from("apps.toml"),
        }
    }
}

impl ExecutorConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = ExecutorConfig::default();

        config.capabilities = CapabilityFlags::from_env();

        if let Ok(root) = std::env::var("COMMANDLY_SANDBOX_ROOT") {
            config.sandbox_root = PathBuf::from(root);
        }

        if let Some(timeout) = std::env::var("COMMANDLY_COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.constraints.timeout_secs = timeout;
        }

        config
    }
}

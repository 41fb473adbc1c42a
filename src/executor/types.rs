// Data types for Executor module

use serde::{Deserialize, Serialize};

/// Output from a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The text content from execution
    pub content: String,
    /// Whether the execution resulted in an error
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Classes of gated side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Writing files inside the sandbox
    Write,
    /// Executing arbitrary shell commands
    Execute,
    /// Installing packages
    Install,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Write => write!(f, "write (COMMANDLY_ALLOW_WRITE)"),
            Capability::Execute => write!(f, "full control (COMMANDLY_FULL_CONTROL)"),
            Capability::Install => write!(f, "full control (COMMANDLY_FULL_CONTROL)"),
        }
    }
}

/// Process-wide capability flags, read once at startup and never mutated
#[derive(Debug, Clone, Copy)]
pub struct CapabilityFlags {
    /// Permits file writes
    pub allow_write: bool,
    /// Permits command execution and package installation
    pub full_control: bool,
}

impl Default for CapabilityFlags {
    fn default() -> Self {
        Self {
            allow_write: true,
            full_control: false,
        }
    }
}

impl CapabilityFlags {
    /// Load from COMMANDLY_ALLOW_WRITE / COMMANDLY_FULL_CONTROL
    pub fn from_env() -> Self {
        Self {
            allow_write: env_flag("COMMANDLY_ALLOW_WRITE", true),
            full_control: env_flag("COMMANDLY_FULL_CONTROL", false),
        }
    }

    /// Whether the given operation class is permitted
    pub fn permit(&self, capability: Capability) -> bool {
        match capability {
            Capability::Write => self.allow_write,
            Capability::Execute | Capability::Install => self.full_control,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

/// Constraints for a single execution
#[derive(Debug, Clone)]
pub struct ExecutionConstraints {
    /// Maximum execution time in seconds
    pub timeout_secs: u64,
    /// Maximum output size in bytes (stdout + stderr)
    pub max_output_bytes: usize,
}

impl Default for ExecutionConstraints {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_output_bytes: 1048576, // 1MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let flags = CapabilityFlags::default();
        assert!(flags.permit(Capability::Write));
        assert!(!flags.permit(Capability::Execute));
        assert!(!flags.permit(Capability::Install));
    }

    #[test]
    fn test_full_control_covers_execute_and_install() {
        let flags = CapabilityFlags {
            allow_write: false,
            full_control: true,
        };
        assert!(!flags.permit(Capability::Write));
        assert!(flags.permit(Capability::Execute));
        assert!(flags.permit(Capability::Install));
    }
}

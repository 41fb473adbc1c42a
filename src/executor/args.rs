// Tool name and argument normalization
//
// Model-produced argument bags arrive as loose JSON: historical tool name
// aliases, several accepted key spellings, sometimes a bare string instead
// of a mapping. Everything is normalized to one canonical shape here before
// any handler sees it.

use crate::executor::error::{ExecutorError, Result};
use serde_json::Value;

/// Canonical tool identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ReadFile,
    WriteFile,
    ListDir,
    FindFiles,
    OpenApplication,
    SearchWeb,
    InstallPackage,
    ExecuteCommand,
    Say,
}

impl ToolKind {
    /// Resolve a model-supplied tool name, accepting historical aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "read_file" => Some(Self::ReadFile),
            "write_file" => Some(Self::WriteFile),
            "list_dir" => Some(Self::ListDir),
            "find_files" => Some(Self::FindFiles),
            // Both names have been emitted by models in the wild
            "open_application" | "open_program" => Some(Self::OpenApplication),
            "search_web" => Some(Self::SearchWeb),
            "install_package" => Some(Self::InstallPackage),
            "execute_command" => Some(Self::ExecuteCommand),
            "say" => Some(Self::Say),
            _ => None,
        }
    }

    /// Canonical name for logging and feedback
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadFile => "read_file",
            Self::WriteFile => "write_file",
            Self::ListDir => "list_dir",
            Self::FindFiles => "find_files",
            Self::OpenApplication => "open_application",
            Self::SearchWeb => "search_web",
            Self::InstallPackage => "install_package",
            Self::ExecuteCommand => "execute_command",
            Self::Say => "say",
        }
    }
}

/// A tool invocation after alias and argument normalization
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    ReadFile { path: String },
    WriteFile { path: String, content: String },
    ListDir { path: String },
    FindFiles { root: String, query: String },
    OpenApplication { name: String },
    SearchWeb { query: String },
    InstallPackage { name: String },
    ExecuteCommand { command: String },
    Say { text: String },
}

/// Accepted key spellings for the application name
const APP_NAME_KEYS: &[&str] = &["name", "application", "program", "app", "application_name"];

impl ToolRequest {
    /// Normalize a raw (tool name, argument bag) pair into a canonical
    /// request, or fail with `UnknownTool`/`InvalidInput`.
    pub fn normalize(tool: &str, args: &Value) -> Result<Self> {
        let kind =
            ToolKind::parse(tool).ok_or_else(|| ExecutorError::UnknownTool(tool.to_string()))?;

        match kind {
            ToolKind::ReadFile => Ok(Self::ReadFile {
                path: required_str(kind, args, &["path"])?,
            }),
            ToolKind::WriteFile => Ok(Self::WriteFile {
                path: required_str(kind, args, &["path"])?,
                content: optional_str(args, &["content"]).unwrap_or_default(),
            }),
            ToolKind::ListDir => Ok(Self::ListDir {
                path: optional_str(args, &["path"]).unwrap_or_else(|| ".".to_string()),
            }),
            ToolKind::FindFiles => Ok(Self::FindFiles {
                root: optional_str(args, &["root"]).unwrap_or_else(|| ".".to_string()),
                query: optional_str(args, &["query"]).unwrap_or_default(),
            }),
            ToolKind::OpenApplication => {
                // A bare string is accepted in place of a mapping
                let name = match args {
                    Value::String(s) => Some(s.clone()),
                    _ => optional_str(args, APP_NAME_KEYS),
                };
                let name = name.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
                    ExecutorError::InvalidInput(
                        kind.name().to_string(),
                        "missing application name".to_string(),
                    )
                })?;
                Ok(Self::OpenApplication {
                    name: name.trim().to_lowercase(),
                })
            }
            ToolKind::SearchWeb => Ok(Self::SearchWeb {
                query: required_str(kind, args, &["query"])?,
            }),
            ToolKind::InstallPackage => Ok(Self::InstallPackage {
                name: required_str(kind, args, &["name"])?,
            }),
            ToolKind::ExecuteCommand => Ok(Self::ExecuteCommand {
                command: required_str(kind, args, &["command"])?,
            }),
            ToolKind::Say => Ok(Self::Say {
                text: optional_str(args, &["text"]).unwrap_or_else(|| "Done.".to_string()),
            }),
        }
    }

    /// Canonical kind of this request
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::ReadFile { .. } => ToolKind::ReadFile,
            Self::WriteFile { .. } => ToolKind::WriteFile,
            Self::ListDir { .. } => ToolKind::ListDir,
            Self::FindFiles { .. } => ToolKind::FindFiles,
            Self::OpenApplication { .. } => ToolKind::OpenApplication,
            Self::SearchWeb { .. } => ToolKind::SearchWeb,
            Self::InstallPackage { .. } => ToolKind::InstallPackage,
            Self::ExecuteCommand { .. } => ToolKind::ExecuteCommand,
            Self::Say { .. } => ToolKind::Say,
        }
    }
}

/// First present, non-empty string among the accepted keys
fn optional_str(args: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| args.get(k))
        .filter_map(|v| v.as_str())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn required_str(kind: ToolKind, args: &Value, keys: &[&str]) -> Result<String> {
    optional_str(args, keys).ok_or_else(|| {
        ExecutorError::InvalidInput(
            kind.name().to_string(),
            format!("missing '{}'", keys[0]),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_open_application_aliases_converge() {
        let a = ToolRequest::normalize("open_application", &json!({"application": "Calculator"}))
            .unwrap();
        let b = ToolRequest::normalize("open_program", &json!({"name": "calculator"})).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a,
            ToolRequest::OpenApplication {
                name: "calculator".to_string()
            }
        );
    }

    #[test]
    fn test_open_application_bare_string() {
        let req = ToolRequest::normalize("open_application", &json!("Firefox")).unwrap();
        assert_eq!(
            req,
            ToolRequest::OpenApplication {
                name: "firefox".to_string()
            }
        );
    }

    #[test]
    fn test_open_application_all_key_spellings() {
        for key in ["name", "application", "program", "app", "application_name"] {
            let req =
                ToolRequest::normalize("open_application", &json!({key: "Files"})).unwrap();
            assert_eq!(
                req,
                ToolRequest::OpenApplication {
                    name: "files".to_string()
                }
            );
        }
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let result = ToolRequest::normalize("format_disk", &json!({}));
        assert!(matches!(result, Err(ExecutorError::UnknownTool(_))));
    }

    #[test]
    fn test_missing_required_arg_rejected() {
        let result = ToolRequest::normalize("read_file", &json!({}));
        assert!(matches!(result, Err(ExecutorError::InvalidInput(_, _))));
    }

    #[test]
    fn test_list_dir_defaults_to_current() {
        let req = ToolRequest::normalize("list_dir", &json!({})).unwrap();
        assert_eq!(
            req,
            ToolRequest::ListDir {
                path: ".".to_string()
            }
        );
    }

    #[test]
    fn test_say_default_text() {
        let req = ToolRequest::normalize("say", &json!({})).unwrap();
        assert_eq!(
            req,
            ToolRequest::Say {
                text: "Done.".to_string()
            }
        );
    }
}

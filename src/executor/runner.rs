// Main Executor implementation
//
// The dispatcher is the error boundary between the OS/filesystem and the
// agent loop: every branch converts internal errors into failure-tagged
// outputs, so `execute` itself never fails.

use crate::executor::args::ToolRequest;
use crate::executor::config::ExecutorConfig;
use crate::executor::error::{ExecutorError, Result};
use crate::executor::file_tools;
use crate::executor::sandbox::Sandbox;
use crate::executor::system;
use crate::executor::types::{Capability, ToolOutput};
use crate::status::{Mode, StatusCell};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Tool dispatch table
pub struct Executor {
    config: ExecutorConfig,
    sandbox: Sandbox,
    apps: HashMap<String, String>,
    status: StatusCell,
}

impl Executor {
    /// Initialize: canonicalize the sandbox root and load the application
    /// launch table (built-ins overridden by apps.toml entries).
    pub fn init(config: ExecutorConfig, status: StatusCell) -> Result<Self> {
        debug!(
            sandbox_root = %config.sandbox_root.display(),
            timeout_secs = config.constraints.timeout_secs,
            allow_write = config.capabilities.allow_write,
            full_control = config.capabilities.full_control,
            shell = %config.shell,
            "initializing executor"
        );

        let sandbox = Sandbox::new(&config.sandbox_root)?;

        let mut apps = system::default_app_commands();
        match system::load_app_commands(&config.apps_toml_path) {
            Ok(overrides) => apps.extend(overrides),
            Err(e) => warn!(error = %e, "failed to load apps.toml, using built-in table"),
        }

        info!(
            sandbox_root = %sandbox.root().display(),
            app_count = apps.len(),
            "executor initialized"
        );

        Ok(Self {
            config,
            sandbox,
            apps,
            status,
        })
    }

    /// Execute a tool by name with a raw JSON argument bag. Infallible:
    /// every internal error becomes a failure-tagged output.
    pub async fn execute(&self, tool_name: &str, args: &Value) -> ToolOutput {
        match self.dispatch(tool_name, args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %tool_name, error = %e, "tool execution failed");
                ToolOutput::error(e.to_string())
            }
        }
    }

    async fn dispatch(&self, tool_name: &str, args: &Value) -> Result<ToolOutput> {
        let request = ToolRequest::normalize(tool_name, args)?;
        info!(tool = request.kind().name(), "executing tool");

        match request {
            ToolRequest::ReadFile { path } => {
                let resolved = self.sandbox.resolve(&path)?;
                Ok(ToolOutput::success(file_tools::read_text(&resolved)?))
            }
            ToolRequest::WriteFile { path, content } => {
                self.permit(Capability::Write, "write_file")?;
                if file_tools::source_content_too_short(&path, &content) {
                    return Err(ExecutorError::ContentTooShort(path));
                }
                let resolved = self.sandbox.resolve(&path)?;
                Ok(ToolOutput::success(file_tools::write_text(
                    &resolved, &content,
                )?))
            }
            ToolRequest::ListDir { path } => {
                let resolved = self.sandbox.resolve(&path)?;
                Ok(ToolOutput::success(file_tools::list_dir(&resolved)?))
            }
            ToolRequest::FindFiles { root, query } => {
                let resolved = self.sandbox.resolve(&root)?;
                let matches = file_tools::find_files(&resolved, &query)?;
                if matches.is_empty() {
                    Ok(ToolOutput::success("No matching files found"))
                } else {
                    Ok(ToolOutput::success(matches.join("\n")))
                }
            }
            ToolRequest::OpenApplication { name } => {
                self.status.set(Mode::Acting);
                Ok(ToolOutput::success(
                    system::open_application(&name, &self.apps).await?,
                ))
            }
            ToolRequest::SearchWeb { query } => {
                self.status.set(Mode::Acting);
                Ok(ToolOutput::success(system::search_web(&query).await?))
            }
            ToolRequest::InstallPackage { name } => {
                self.permit(Capability::Install, "install_package")?;
                self.status.set(Mode::Acting);
                system::install_package(&name).await
            }
            ToolRequest::ExecuteCommand { command } => {
                // Checked independently of the capability gate
                if let Some(danger) = system::denied_substring(&command) {
                    warn!(command = %command, matched = danger, "dangerous command blocked");
                    return Err(ExecutorError::DeniedCommand(command));
                }
                self.permit(Capability::Execute, "execute_command")?;
                self.status.set(Mode::Acting);
                system::run_shell(&self.config.shell, &command, &self.config.constraints).await
            }
            ToolRequest::Say { text } => {
                self.status.set(Mode::Speaking);
                Ok(ToolOutput::success(text))
            }
        }
    }

    fn permit(&self, capability: Capability, tool: &str) -> Result<()> {
        if self.config.capabilities.permit(capability) {
            Ok(())
        } else {
            warn!(tool = %tool, capability = %capability, "capability denied");
            Err(ExecutorError::CapabilityDenied {
                tool: tool.to_string(),
                capability,
            })
        }
    }
}

// System tools - application launch, web search, package install, shell

use crate::executor::error::{ExecutorError, Result};
use crate::executor::types::{ExecutionConstraints, ToolOutput};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

/// Destructive command substrings rejected before any spawn, independent of
/// the capability gate.
const COMMAND_DENYLIST: &[&str] = &[
    "rm -rf", "del /f", "format", "mkfs", "shutdown", "reboot", "halt",
];

/// The denylist entry matched by the command, if any
pub fn denied_substring(command: &str) -> Option<&'static str> {
    let lowered = command.to_lowercase();
    COMMAND_DENYLIST
        .iter()
        .find(|danger| lowered.contains(**danger))
        .copied()
}

/// Built-in application name -> launch command table
pub fn default_app_commands() -> HashMap<String, String> {
    let table = [
        ("calculator", "gnome-calculator"),
        ("calc", "gnome-calculator"),
        ("files", "nautilus"),
        ("file manager", "nautilus"),
        ("explorer", "nautilus"),
        ("text editor", "gedit"),
        ("notepad", "gedit"),
        ("firefox", "firefox"),
        ("chrome", "google-chrome"),
        ("browser", "firefox"),
        ("code", "code"),
        ("vs code", "code"),
        ("visual studio code", "code"),
        ("terminal", "gnome-terminal"),
    ];
    table
        .iter()
        .map(|(name, cmd)| (name.to_string(), cmd.to_string()))
        .collect()
}

/// Load application launch overrides from an apps.toml file:
///
/// ```toml
/// [apps]
/// calculator = "kcalc"
/// ```
pub fn load_app_commands(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        debug!(path = %path.display(), "apps.toml not found, using built-in table");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    let config: toml::Value = toml::from_str(&content)?;

    let mut commands = HashMap::new();
    if let Some(apps) = config.get("apps").and_then(|v| v.as_table()) {
        for (name, value) in apps {
            if let Some(cmd) = value.as_str() {
                commands.insert(name.to_lowercase(), cmd.to_string());
            }
        }
    }

    debug!(path = %path.display(), app_count = commands.len(), "loaded app commands from config");
    Ok(commands)
}

/// Launch an application by (already lowercased) name, detached.
pub async fn open_application(name: &str, apps: &HashMap<String, String>) -> Result<String> {
    let command_line = apps.get(name).cloned().unwrap_or_else(|| name.to_string());

    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        ExecutorError::InvalidInput("open_application".to_string(), "empty command".to_string())
    })?;

    debug!(app = %name, command = %command_line, "launching application");

    let mut cmd = Command::new(program);
    cmd.args(parts);
    cmd.spawn()
        .map_err(|e| ExecutorError::SpawnFailed("open_application".to_string(), e.to_string()))?;

    info!(app = %name, "application launched");
    Ok(format!("Opened {}", name))
}

/// Open a web search for the query in the default browser.
pub async fn search_web(query: &str) -> Result<String> {
    let url = format!(
        "https://www.google.com/search?q={}",
        query.replace(' ', "+")
    );

    Command::new("xdg-open")
        .arg(&url)
        .spawn()
        .map_err(|e| ExecutorError::SpawnFailed("search_web".to_string(), e.to_string()))?;

    info!(query = %query, "web search opened");
    Ok(format!("Searched for: {}", query))
}

/// Install a Python package via pip, capturing combined output.
pub async fn install_package(name: &str) -> Result<ToolOutput> {
    debug!(package = %name, "installing package");

    let output = Command::new("python3")
        .args(["-m", "pip", "install", name])
        .output()
        .await
        .map_err(|e| ExecutorError::SpawnFailed("install_package".to_string(), e.to_string()))?;

    if output.status.success() {
        info!(package = %name, "package installed");
        Ok(ToolOutput::success(format!(
            "Successfully installed {}",
            name
        )))
    } else {
        Ok(ToolOutput::error(format!(
            "Failed to install {}: {}",
            name,
            String::from_utf8_lossy(&output.stderr)
        )))
    }
}

/// Execute a shell command with a hard wall-clock timeout, capturing stdout,
/// stderr, and the exit code into one combined result.
pub async fn run_shell(
    shell: &str,
    command: &str,
    constraints: &ExecutionConstraints,
) -> Result<ToolOutput> {
    let start = Instant::now();

    debug!(command = %command, "executing shell command");

    let mut cmd = Command::new(shell);
    cmd.arg("-c")
        .arg(command)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        // The child dies with the timed-out future
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| ExecutorError::SpawnFailed("execute_command".to_string(), e.to_string()))?;

    let deadline = Duration::from_secs(constraints.timeout_secs);
    let output = match timeout(deadline, child.wait_with_output()).await {
        Ok(result) => result
            .map_err(|e| ExecutorError::SpawnFailed("execute_command".to_string(), e.to_string()))?,
        Err(_) => {
            return Err(ExecutorError::Timeout(
                "execute_command".to_string(),
                constraints.timeout_secs,
            ));
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;

    let mut content = String::new();

    if !output.stdout.is_empty() {
        content.push_str("[stdout]\n");
        content.push_str(&String::from_utf8_lossy(&output.stdout));
    }

    if !output.stderr.is_empty() {
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str("[stderr]\n");
        content.push_str(&String::from_utf8_lossy(&output.stderr));
    }

    content.push_str(&format!(
        "\n[exit_code]\n{}",
        output.status.code().unwrap_or(-1)
    ));

    truncate_output(&mut content, constraints.max_output_bytes);

    let is_error = !output.status.success();

    info!(
        command = %command.chars().take(100).collect::<String>(),
        duration_ms = duration_ms,
        exit_code = output.status.code().unwrap_or(-1),
        output_bytes = content.len(),
        is_error = is_error,
        "shell command executed"
    );

    Ok(ToolOutput {
        content,
        is_error,
    })
}

fn truncate_output(content: &mut String, max_bytes: usize) {
    if content.len() <= max_bytes {
        return;
    }
    let mut cut = max_bytes;
    while cut > 0 && !content.is_char_boundary(cut) {
        cut -= 1;
    }
    content.truncate(cut);
    content.push_str("\n[truncated]");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_substring() {
        assert_eq!(denied_substring("rm -rf /"), Some("rm -rf"));
        assert_eq!(denied_substring("sudo REBOOT now"), Some("reboot"));
        assert_eq!(denied_substring("mkfs.ext4 /dev/sda1"), Some("mkfs"));
        assert_eq!(denied_substring("echo hello"), None);
    }

    #[test]
    fn test_truncate_output_respects_char_boundary() {
        let mut s = "héllo wörld".to_string();
        truncate_output(&mut s, 3);
        assert!(s.ends_with("[truncated]"));
        assert!(s.is_char_boundary(s.len()));
    }

    #[test]
    fn test_default_app_table_has_calculator() {
        let apps = default_app_commands();
        assert_eq!(apps.get("calculator").map(String::as_str), Some("gnome-calculator"));
    }
}

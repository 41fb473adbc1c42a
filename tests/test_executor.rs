// Integration tests for Executor module
// This file should be run with cargo test --test test_executor

#[path = "../src/status.rs"]
mod status;

#[path = "../src/executor/mod.rs"]
mod executor;

use executor::{CapabilityFlags, ExecutionConstraints, ExecutorConfig, ToolRequest};
use serde_json::json;
use std::path::{Path, PathBuf};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .init();
    });
}

fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("commandly-test-{}-{}", tag, rand::random::<u32>()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn create_executor(root: &Path, capabilities: CapabilityFlags) -> executor::Executor {
    let config = ExecutorConfig {
        sandbox_root: root.to_path_buf(),
        capabilities,
        ..Default::default()
    };
    executor::Executor::init(config, status::StatusCell::new()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test write/read roundtrip inside the sandbox
    #[tokio::test]
    async fn test_write_then_read() {
        init_tracing();

        let root = temp_root("rw");
        let exec = create_executor(&root, CapabilityFlags::default());

        let written = exec
            .execute("write_file", &json!({"path": "notes/todo.txt", "content": "buy milk"}))
            .await;
        assert!(!written.is_error, "write should succeed: {}", written.content);
        assert!(written.content.contains("todo.txt"));

        let read = exec
            .execute("read_file", &json!({"path": "notes/todo.txt"}))
            .await;
        assert!(!read.is_error);
        assert_eq!(read.content, "buy milk");
    }

    /// Relative traversal out of the sandbox must fail
    #[tokio::test]
    async fn test_parent_traversal_rejected() {
        init_tracing();

        let root = temp_root("escape");
        let exec = create_executor(&root, CapabilityFlags::default());

        let result = exec
            .execute("read_file", &json!({"path": "../../etc/passwd"}))
            .await;
        assert!(result.is_error);
        assert!(
            result.content.contains("outside sandbox"),
            "unexpected message: {}",
            result.content
        );
    }

    /// An absolute path outside the sandbox fails even though it exists
    #[tokio::test]
    async fn test_absolute_path_outside_rejected() {
        init_tracing();

        let root = temp_root("abs");
        let exec = create_executor(&root, CapabilityFlags::default());

        let result = exec
            .execute("read_file", &json!({"path": "/etc/passwd"}))
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("outside sandbox"));
    }

    /// With allow_write=false the write is refused and nothing is written
    #[tokio::test]
    async fn test_write_capability_gated() {
        init_tracing();

        let root = temp_root("gate-write");
        let exec = create_executor(
            &root,
            CapabilityFlags {
                allow_write: false,
                full_control: false,
            },
        );

        let result = exec
            .execute("write_file", &json!({"path": "a.txt", "content": "hello"}))
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("COMMANDLY_ALLOW_WRITE"));
        assert!(!root.join("a.txt").exists(), "no file may be created");
    }

    /// With full_control=false no process is spawned
    #[tokio::test]
    async fn test_execute_command_capability_gated() {
        init_tracing();

        let root = temp_root("gate-exec");
        let exec = create_executor(&root, CapabilityFlags::default());

        let result = exec
            .execute("execute_command", &json!({"command": "echo hi"}))
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("COMMANDLY_FULL_CONTROL"));
    }

    /// Destructive commands are blocked independent of the capability gate
    #[tokio::test]
    async fn test_command_denylist() {
        init_tracing();

        let root = temp_root("denylist");
        let exec = create_executor(
            &root,
            CapabilityFlags {
                allow_write: true,
                full_control: true,
            },
        );

        let result = exec
            .execute("execute_command", &json!({"command": "rm -rf /"}))
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("Dangerous command blocked"));
    }

    /// Shell output capture: stdout, stderr and exit code in one result
    #[tokio::test]
    async fn test_execute_command_capture() {
        init_tracing();

        let root = temp_root("capture");
        let exec = create_executor(
            &root,
            CapabilityFlags {
                allow_write: true,
                full_control: true,
            },
        );

        let result = exec
            .execute("execute_command", &json!({"command": "echo hello"}))
            .await;
        assert!(!result.is_error);
        assert!(result.content.contains("hello"));
        assert!(result.content.contains("[exit_code]\n0"));

        let failing = exec
            .execute("execute_command", &json!({"command": "exit 3"}))
            .await;
        assert!(failing.is_error);
        assert!(failing.content.contains("[exit_code]\n3"));
    }

    /// A command exceeding the deadline yields a distinct timeout failure
    #[tokio::test]
    async fn test_execute_command_timeout() {
        init_tracing();

        let root = temp_root("timeout");
        let config = ExecutorConfig {
            sandbox_root: root.clone(),
            capabilities: CapabilityFlags {
                allow_write: true,
                full_control: true,
            },
            constraints: ExecutionConstraints {
                timeout_secs: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let exec = executor::Executor::init(config, status::StatusCell::new()).unwrap();

        let result = exec
            .execute("execute_command", &json!({"command": "sleep 3"}))
            .await;
        assert!(result.is_error);
        assert!(
            result.content.contains("timeout"),
            "unexpected message: {}",
            result.content
        );
    }

    /// Unknown tool names are reported, never a crash
    #[tokio::test]
    async fn test_unknown_tool() {
        init_tracing();

        let root = temp_root("unknown");
        let exec = create_executor(&root, CapabilityFlags::default());

        let result = exec.execute("defragment", &json!({})).await;
        assert!(result.is_error);
        assert!(result.content.contains("Unknown tool"));
    }

    /// Suspiciously short content for a source file is refused
    #[tokio::test]
    async fn test_short_source_content_rejected() {
        init_tracing();

        let root = temp_root("short");
        let exec = create_executor(&root, CapabilityFlags::default());

        let result = exec
            .execute("write_file", &json!({"path": "app.py", "content": "print(1)"}))
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("too short"));
        assert!(!root.join("app.py").exists());
    }

    /// Both historical launch tool names normalize to the same request
    #[tokio::test]
    async fn test_open_application_alias_normalization() {
        init_tracing();

        let a = ToolRequest::normalize("open_application", &json!({"application": "Calculator"}))
            .unwrap();
        let b = ToolRequest::normalize("open_program", &json!({"name": "calculator"})).unwrap();
        assert_eq!(a, b);
    }

    /// Aliased launch requests hit the same underlying operation
    #[tokio::test]
    async fn test_open_application_aliases_launch_same_app() {
        init_tracing();

        let root = temp_root("alias");
        // Point the launch table at a no-op binary so the spawn succeeds
        let apps_toml = root.join("apps.toml");
        std::fs::write(&apps_toml, "[apps]\ntestapp = \"true\"\n").unwrap();

        let config = ExecutorConfig {
            sandbox_root: root.clone(),
            apps_toml_path: apps_toml,
            ..Default::default()
        };
        let exec = executor::Executor::init(config, status::StatusCell::new()).unwrap();

        let a = exec
            .execute("open_application", &json!({"application": "TestApp"}))
            .await;
        let b = exec.execute("open_program", &json!({"name": "testapp"})).await;

        assert!(!a.is_error, "{}", a.content);
        assert!(!b.is_error, "{}", b.content);
        assert_eq!(a.content, b.content);
    }

    /// say returns its text and flips the status cell to speaking
    #[tokio::test]
    async fn test_say_sets_speaking_status() {
        init_tracing();

        let root = temp_root("say");
        let cell = status::StatusCell::new();
        let config = ExecutorConfig {
            sandbox_root: root.clone(),
            ..Default::default()
        };
        let exec = executor::Executor::init(config, cell.clone()).unwrap();

        let result = exec.execute("say", &json!({"text": "all done"})).await;
        assert!(!result.is_error);
        assert_eq!(result.content, "all done");
        assert_eq!(cell.get(), status::Mode::Speaking);
    }

    /// list_dir marks directories and skips hidden entries
    #[tokio::test]
    async fn test_list_dir() {
        init_tracing();

        let root = temp_root("list");
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("file.txt"), "x").unwrap();
        std::fs::write(root.join(".hidden"), "x").unwrap();

        let exec = create_executor(&root, CapabilityFlags::default());
        let result = exec.execute("list_dir", &json!({"path": "."})).await;

        assert!(!result.is_error);
        assert!(result.content.contains("sub/"));
        assert!(result.content.contains("file.txt"));
        assert!(!result.content.contains(".hidden"));
    }

    /// find_files matches by name substring, recursively
    #[tokio::test]
    async fn test_find_files() {
        init_tracing();

        let root = temp_root("find");
        std::fs::create_dir_all(root.join("a/b")).unwrap();
        std::fs::write(root.join("a/b/report.md"), "x").unwrap();
        std::fs::write(root.join("a/other.txt"), "x").unwrap();

        let exec = create_executor(&root, CapabilityFlags::default());
        let result = exec
            .execute("find_files", &json!({"root": ".", "query": "report"}))
            .await;

        assert!(!result.is_error);
        assert!(result.content.contains("report.md"));
        assert!(!result.content.contains("other.txt"));

        let none = exec
            .execute("find_files", &json!({"root": ".", "query": "zzz"}))
            .await;
        assert!(!none.is_error);
        assert!(none.content.contains("No matching files"));
    }
}

// Agent loop implementation
//
// States: Deciding -> Dispatching -> Feedback -> (Deciding | Terminated).
// The loop runs fully sequentially: each iteration's model call and tool
// execution complete before the next begins.

use crate::agent::decide::{decide, ModelClient};
use crate::agent::error::AgentError;
use crate::agent::mode::{classify, Intent};
use crate::agent::types::{Action, AgentConfig, ConversationTurn};
use crate::brain::RequestBuilder;
use crate::executor::{Executor, ToolKind, ToolOutput};
use crate::status::{Mode, StatusCell};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Fixed terminal message when the iteration cap is reached. A defined
/// outcome, not a failure.
pub const MAX_ITERATIONS_MESSAGE: &str = "Task completed (max iterations reached).";

/// Agent loop controller
pub struct AgentLoop<C: ModelClient> {
    model: C,
    executor: Executor,
    config: AgentConfig,
    status: StatusCell,
}

impl<C: ModelClient> AgentLoop<C> {
    /// Create new agent loop
    pub fn new(model: C, executor: Executor, config: AgentConfig, status: StatusCell) -> Self {
        Self {
            model,
            executor,
            config,
            status,
        }
    }

    /// The status cell shared with the presentation layer
    pub fn status(&self) -> &StatusCell {
        &self.status
    }

    /// Handle one user request: classify, then either converse or act.
    /// Always returns a final string; no error crosses this boundary.
    pub async fn handle(&self, user_text: &str) -> String {
        self.status.set(Mode::Thinking);

        let reply = match classify(user_text) {
            Intent::Converse => {
                info!(input = %user_text, "handling conversational request");
                match self.converse(user_text).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "conversation failed");
                        format!("Error: {}", e)
                    }
                }
            }
            Intent::Act => {
                info!(input = %user_text, "handling agent request");
                self.run_agent(user_text).await
            }
        };

        self.status.set(Mode::Idle);
        reply
    }

    /// Plain chat completion with the conversational persona
    async fn converse(&self, user_text: &str) -> Result<String, AgentError> {
        let request = RequestBuilder::new(self.model.model())
            .system(self.config.converse_prompt.as_str())
            .user(user_text)
            .temperature(self.config.converse_temperature)
            .max_tokens(self.config.converse_max_tokens)
            .build()
            .map_err(AgentError::RequestBuild)?;

        self.model
            .complete(request)
            .await
            .map_err(AgentError::Inference)
    }

    /// Run the bounded decision loop until a terminal action or the
    /// iteration cap.
    pub async fn run_agent(&self, user_text: &str) -> String {
        let mut history: Vec<ConversationTurn> = Vec::new();

        for iteration in 1..=self.config.max_iterations {
            info!(iteration = iteration, "agent iteration");
            self.status.set(Mode::Thinking);

            let action = decide(&self.model, &self.config, &history, user_text).await;

            let (name, args, comment) = match action {
                Action::Done { say } => {
                    info!(iteration = iteration, say = %say, "agent completed");
                    return say;
                }
                Action::Tool {
                    name,
                    args,
                    comment,
                } => (name, args, comment),
            };

            let kind = ToolKind::parse(&name);
            if let Some(comment) = &comment {
                debug!(tool = %name, comment = %comment, "model comment");
            }

            let output = self.executor.execute(&name, &args).await;
            debug!(
                tool = %name,
                is_error = output.is_error,
                preview = %output.content.chars().take(100).collect::<String>(),
                "tool result"
            );

            // Feedback turns bias the model's next decision
            history.push(ConversationTurn::assistant(render_action(
                &name,
                &args,
                comment.as_deref(),
            )));
            history.push(ConversationTurn::user(feedback_for(kind, &name, &output)));

            // Terminal short-circuits: speaking, or a successful write, ends
            // the task without waiting for an explicit completion signal.
            match kind {
                Some(ToolKind::Say) => {
                    info!(iteration = iteration, "say short-circuit");
                    return output.content;
                }
                Some(ToolKind::WriteFile) if !output.is_error => {
                    info!(iteration = iteration, "write short-circuit");
                    return output.content;
                }
                _ => {}
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "max iterations reached"
        );
        MAX_ITERATIONS_MESSAGE.to_string()
    }
}

/// Re-serialize the action as the assistant turn recorded in history
fn render_action(name: &str, args: &Value, comment: Option<&str>) -> String {
    json!({
        "tool": name,
        "args": args,
        "comment": comment.unwrap_or(""),
    })
    .to_string()
}

/// Synthesize the user feedback turn for a tool outcome, with tailored
/// phrasing for read vs. write vs. other tools.
fn feedback_for(kind: Option<ToolKind>, name: &str, output: &ToolOutput) -> String {
    if output.is_error {
        return format!(
            "Tool {} failed: {}. Try a different approach or mark the task as done.",
            name, output.content
        );
    }

    match kind {
        Some(ToolKind::ReadFile) => format!(
            "File read successfully. Content length: {} characters. Now modify it with your changes and write the complete file.",
            output.content.chars().count()
        ),
        Some(ToolKind::WriteFile) => format!(
            "File written successfully: {}. Task should be complete now.",
            output.content
        ),
        _ => format!(
            "Tool {} completed: {}. Continue if needed or mark the task as done.",
            name, output.content
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_phrasing() {
        let ok = ToolOutput::success("hello world");
        let read = feedback_for(Some(ToolKind::ReadFile), "read_file", &ok);
        assert!(read.contains("Content length: 11 characters"));

        let err = ToolOutput::error("Path outside sandbox: /etc");
        let failed = feedback_for(Some(ToolKind::ReadFile), "read_file", &err);
        assert!(failed.starts_with("Tool read_file failed:"));

        let other = feedback_for(Some(ToolKind::ListDir), "list_dir", &ok);
        assert!(other.contains("Continue if needed"));
    }

    #[test]
    fn test_render_action_is_wire_format() {
        let rendered = render_action("say", &json!({"text": "hi"}), Some("greeting"));
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["tool"], "say");
        assert_eq!(parsed["args"]["text"], "hi");
    }
}

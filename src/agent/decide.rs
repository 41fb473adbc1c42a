// Decision engine - asks the model for the next step and parses its reply
//
// The model is instructed to answer with a single JSON object. Replies are
// parsed in two stages: a strict parse, then a documented fallback pass that
// extracts the first balanced {...} substring from the raw text. Nothing
// here ever fails: unusable replies degrade to a default say action, and
// model errors become a terminal action carrying the error text.

use crate::agent::error::AgentError;
use crate::agent::types::{Action, AgentConfig, ConversationTurn};
use crate::brain::{Brain, ChatRequest, RequestBuilder};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Default reply when the model's output cannot be parsed at all
pub const FALLBACK_TEXT: &str = "I'll help you with that request.";

/// Model client seam (for testing against scripted stubs)
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, String>;
    fn model(&self) -> &str;
}

#[async_trait]
impl ModelClient for Brain {
    async fn complete(&self, request: ChatRequest) -> Result<String, String> {
        Brain::complete(self, request).await.map_err(|e| e.to_string())
    }

    fn model(&self) -> &str {
        self.default_model()
    }
}

/// Decide the next action: compose the bounded conversation window, call the
/// model, parse the reply.
pub async fn decide<C: ModelClient>(
    model: &C,
    config: &AgentConfig,
    history: &[ConversationTurn],
    user_text: &str,
) -> Action {
    let request = match build_request(model, config, history, user_text) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "failed to build decision request");
            return Action::Done {
                say: format!("Agent error: {}", e),
            };
        }
    };

    let raw = match model.complete(request).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "model call failed");
            return Action::Done {
                say: format!("Agent error: {}", e),
            };
        }
    };

    debug!(preview = %raw.chars().take(200).collect::<String>(), "raw model reply");
    parse_action(&raw)
}

/// Fixed system turn + last `history_window` prior turns + new user turn.
/// Older turns are dropped, never summarized.
fn build_request<C: ModelClient>(
    model: &C,
    config: &AgentConfig,
    history: &[ConversationTurn],
    user_text: &str,
) -> Result<ChatRequest, AgentError> {
    let mut builder = RequestBuilder::new(model.model()).system(config.system_prompt.as_str());

    let start = history.len().saturating_sub(config.history_window);
    for turn in &history[start..] {
        builder = builder.message(turn.role, turn.content.as_str());
    }

    builder
        .user(user_text)
        .temperature(config.agent_temperature)
        .max_tokens(config.agent_max_tokens)
        .build()
        .map_err(AgentError::RequestBuild)
}

/// Parse raw model text into an Action. Strict parse first, then balanced
/// object extraction, then the default say fallback.
pub fn parse_action(raw: &str) -> Action {
    if let Ok(wire) = serde_json::from_str::<ActionWire>(raw.trim()) {
        if let Some(action) = wire.into_action() {
            return action;
        }
    }

    if let Some(candidate) = extract_json_object(raw) {
        if let Ok(wire) = serde_json::from_str::<ActionWire>(candidate) {
            if let Some(action) = wire.into_action() {
                debug!("recovered action from embedded JSON object");
                return action;
            }
        }
    }

    warn!(preview = %raw.chars().take(120).collect::<String>(), "unparsable model reply, using fallback");
    fallback_action()
}

/// The default say action used when the model's reply is unusable
pub fn fallback_action() -> Action {
    Action::Tool {
        name: "say".to_string(),
        args: json!({ "text": FALLBACK_TEXT }),
        comment: Some("Processing request".to_string()),
    }
}

/// Wire shape of a model reply
#[derive(Debug, Deserialize)]
struct ActionWire {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    say: Option<String>,
    #[serde(default)]
    tool: Option<String>,
    #[serde(default)]
    args: Option<Value>,
    #[serde(default)]
    comment: Option<String>,
}

impl ActionWire {
    /// Exactly one variant must be populated; anything else is None and the
    /// caller degrades to the fallback.
    fn into_action(self) -> Option<Action> {
        if self.done {
            return Some(Action::Done {
                say: self.say.unwrap_or_else(|| "Task completed.".to_string()),
            });
        }
        match self.tool {
            Some(tool) if !tool.is_empty() => Some(Action::Tool {
                name: tool,
                args: self.args.unwrap_or_else(|| json!({})),
                comment: self.comment,
            }),
            _ => None,
        }
    }
}

/// First balanced `{...}` substring of the text, honoring JSON string
/// escapes so braces inside strings don't count.
fn extract_json_object(raw: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&raw[start?..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

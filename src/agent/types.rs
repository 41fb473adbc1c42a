// Agent types

use crate::brain::Role;
use serde_json::Value;

/// The model's proposed next step
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Invoke a tool
    Tool {
        name: String,
        args: Value,
        comment: Option<String>,
    },
    /// Stop and return a final message
    Done { say: String },
}

/// One turn of per-request conversation history
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Agent loop configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum decision iterations per request
    pub max_iterations: u32,
    /// How many prior turns are replayed to the model
    pub history_window: usize,
    /// System prompt for the acting path
    pub system_prompt: String,
    /// System prompt for the conversational path
    pub converse_prompt: String,
    /// Sampling temperature for the acting path
    pub agent_temperature: f32,
    /// Sampling temperature for the conversational path
    pub converse_temperature: f32,
    /// Output token cap for the acting path
    pub agent_max_tokens: u32,
    /// Output token cap for the conversational path
    pub converse_max_tokens: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            history_window: 3,
            system_prompt: r#"You are Commandly, an autonomous assistant with control over this machine.

You work in steps. Each step, reply with EXACTLY ONE JSON object and nothing else:
{"tool":"<tool_name>","args":{...},"comment":"what I'm doing"}
or, when the task is finished:
{"done":true,"say":"<short summary for the user>"}

Available tools:
- read_file {"path"}: read a text file
- write_file {"path","content"}: write a file (always the complete content)
- list_dir {"path"}: list a directory
- find_files {"root","query"}: find files whose name contains query
- open_application {"name"}: launch an application
- search_web {"query"}: open a web search in the browser
- install_package {"name"}: install a Python package
- execute_command {"command"}: run a shell command
- say {"text"}: speak to the user

When modifying an existing file, read it first, then write back the complete
file with your changes. Never reply with prose outside the JSON object."#
                .to_string(),
            converse_prompt: "You are Commandly. Be concise, helpful, and friendly.".to_string(),
            agent_temperature: 0.2,
            converse_temperature: 0.7,
            agent_max_tokens: 600,
            converse_max_tokens: 500,
        }
    }
}

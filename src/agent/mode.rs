// Mode classifier - routes a user utterance to "act" or "converse"

use tracing::debug;

/// Where a user utterance is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Run the autonomous agent loop
    Act,
    /// Plain conversation
    Converse,
}

/// Trigger substrings that route to the agent loop: action verbs,
/// application nouns, and UI/appearance terms.
const ACT_TRIGGERS: &[&str] = &[
    // Action verbs
    "open", "launch", "start", "run", "execute", "install", "create", "make", "build", "add",
    "write", "modify", "change", "fix", "update", "improve", "delete", "remove", "search web",
    "browse", "download", "upload", "save", "restart", "shutdown", "reboot", "kill process",
    // Object nouns
    "file", "folder", "program", "application", "calculator", "explorer", "browser", "firefox",
    "chrome", "code", "visual studio", "terminal", "task manager",
    // UI/appearance terms
    "appearance", "color", "design", "interface", "gui", "animation",
];

/// Classify raw user text. Pure, deterministic, total: any member of the
/// trigger set appearing as a case-insensitive substring routes to `Act`.
pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();

    for trigger in ACT_TRIGGERS {
        if lowered.contains(trigger) {
            debug!(trigger = trigger, "agent mode triggered");
            return Intent::Act;
        }
    }

    debug!("conversational mode");
    Intent::Converse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_verbs_route_to_act() {
        assert_eq!(classify("Open the calculator"), Intent::Act);
        assert_eq!(classify("please INSTALL numpy"), Intent::Act);
        assert_eq!(classify("write a poem to poem.txt"), Intent::Act);
        assert_eq!(classify("fix the colors of the interface"), Intent::Act);
    }

    #[test]
    fn test_small_talk_routes_to_converse() {
        assert_eq!(classify("how are you today?"), Intent::Converse);
        assert_eq!(classify("tell me a joke"), Intent::Converse);
        assert_eq!(classify("what's the capital of France?"), Intent::Converse);
    }

    #[test]
    fn test_classifier_is_total() {
        assert_eq!(classify(""), Intent::Converse);
        assert_eq!(classify("   "), Intent::Converse);
    }
}

// Status cell - coarse assistant mode shared with the presentation layer

use std::sync::{Arc, RwLock};

/// Coarse assistant mode, displayed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Listening,
    Thinking,
    Acting,
    Speaking,
}

#[allow(dead_code)]
impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Listening => "listening",
            Mode::Thinking => "thinking",
            Mode::Acting => "acting",
            Mode::Speaking => "speaking",
        }
    }
}

/// Single-writer/multi-reader cell holding the current mode.
///
/// The agent side writes; a presentation thread may read concurrently.
/// Clones share the same underlying cell.
#[derive(Debug, Clone, Default)]
pub struct StatusCell {
    inner: Arc<RwLock<Mode>>,
}

impl StatusCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, mode: Mode) {
        let mut guard = self.inner.write().unwrap();
        *guard = mode;
    }

    pub fn get(&self) -> Mode {
        *self.inner.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cell_shared_between_clones() {
        let cell = StatusCell::new();
        let reader = cell.clone();

        assert_eq!(reader.get(), Mode::Idle);
        cell.set(Mode::Acting);
        assert_eq!(reader.get(), Mode::Acting);
        cell.set(Mode::Idle);
        assert_eq!(reader.get(), Mode::Idle);
    }

    #[test]
    fn test_mode_as_str() {
        assert_eq!(Mode::Thinking.as_str(), "thinking");
        assert_eq!(Mode::Speaking.as_str(), "speaking");
    }
}

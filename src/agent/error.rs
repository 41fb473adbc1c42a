// Agent errors

use thiserror::Error;

/// Agent errors. These never cross the loop boundary: the controller
/// converts them to user-visible text.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Request build error: {0}")]
    RequestBuild(&'static str),

    #[error("Inference error: {0}")]
    Inference(String),
}

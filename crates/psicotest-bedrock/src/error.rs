use thiserror::Error;

use psicotest_instruments::error::InterpretError;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("model did not answer within {0}s")]
    Timeout(u64),
}

impl From<BedrockError> for InterpretError {
    fn from(err: BedrockError) -> Self {
        match err {
            BedrockError::ResponseParse(msg) => InterpretError::ResponseParse(msg),
            other => InterpretError::Invocation(other.to_string()),
        }
    }
}

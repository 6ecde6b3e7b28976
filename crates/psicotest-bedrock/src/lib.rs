//! psicotest-bedrock
//!
//! Score interpretation by a Bedrock-hosted language model.

pub mod error;
pub mod interpreter;
pub mod parse;
pub mod prompt;
mod converse;

pub use interpreter::BedrockInterpreter;

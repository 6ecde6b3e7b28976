//! Reading the model's reply.
//!
//! Models do not always return bare JSON. Three shapes are accepted, tried
//! in order: the whole reply, a fenced ```json block, and the span from the
//! first `{` to the last `}`.

use serde::Deserialize;

use crate::error::BedrockError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInterpretation {
    #[serde(default)]
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

pub fn parse_reply(reply: &str) -> Result<ModelInterpretation, BedrockError> {
    let candidates = [
        Some(reply.trim()),
        fenced_block(reply),
        outermost_object(reply),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Ok(parsed) = serde_json::from_str::<ModelInterpretation>(candidate) {
            if parsed.text.trim().is_empty() {
                return Err(BedrockError::ResponseParse("empty text".to_string()));
            }
            return Ok(parsed);
        }
    }

    Err(BedrockError::ResponseParse(format!(
        "no JSON object in reply: {}",
        preview(reply)
    )))
}

fn fenced_block(reply: &str) -> Option<&str> {
    let start = reply.find("```json")? + "```json".len();
    let rest = &reply[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn outermost_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

fn preview(reply: &str) -> String {
    reply.chars().take(120).collect()
}

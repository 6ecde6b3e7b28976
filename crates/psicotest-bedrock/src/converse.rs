use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};

use crate::error::BedrockError;

/// One Converse API round trip. Returns the concatenated text blocks.
pub(crate) async fn invoke_converse(
    client: &Client,
    model_id: &str,
    system_prompt: &str,
    user_message: &str,
    max_tokens: i32,
) -> Result<String, BedrockError> {
    let response = client
        .converse()
        .model_id(model_id)
        .system(SystemContentBlock::Text(system_prompt.to_string()))
        .messages(
            Message::builder()
                .role(ConversationRole::User)
                .content(ContentBlock::Text(user_message.to_string()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))?,
        )
        .inference_config(
            InferenceConfiguration::builder()
                .max_tokens(max_tokens)
                .temperature(0.3)
                .build(),
        )
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    let output_message = response
        .output()
        .and_then(|o| o.as_message().ok())
        .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

    let text = output_message
        .content()
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    Ok(text)
}

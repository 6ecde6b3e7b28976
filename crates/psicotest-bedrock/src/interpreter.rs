use std::time::Duration;

use aws_sdk_bedrockruntime::Client;
use tracing::info;
use uuid::Uuid;

use psicotest_instruments::error::InterpretError;
use psicotest_instruments::interpret::{
    BoxFuture, InterpretRequest, Interpretation, InterpretationSource, Interpreter,
    RuleBasedInterpreter,
};

use crate::converse::invoke_converse;
use crate::error::BedrockError;
use crate::parse::parse_reply;
use crate::prompt::{SYSTEM_PROMPT, build_user_message};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_TOKENS: i32 = 600;

/// Explains scores with a Bedrock model.
///
/// Label and severity always come from the instrument's bands; the model
/// only writes the explanation and recommendations.
pub struct BedrockInterpreter {
    client: Client,
    model_id: String,
    timeout: Duration,
    rules: RuleBasedInterpreter,
}

impl BedrockInterpreter {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            model_id: model_id.into(),
            timeout: DEFAULT_TIMEOUT,
            rules: RuleBasedInterpreter,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn ask(&self, request: &InterpretRequest) -> Result<Interpretation, InterpretError> {
        let classified = self.rules.interpret(request)?;

        let transaction_id = Uuid::new_v4();
        info!(transaction_id = %transaction_id, model = %self.model_id, "requesting interpretation");

        let user_message = build_user_message(request);
        let call = invoke_converse(
            &self.client,
            &self.model_id,
            SYSTEM_PROMPT,
            &user_message,
            MAX_TOKENS,
        );
        let reply = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| BedrockError::Timeout(self.timeout.as_secs()))??;

        let parsed = parse_reply(&reply)?;
        info!(transaction_id = %transaction_id, "interpretation complete");

        let recommendations = if parsed.recommendations.is_empty() {
            classified.recommendations
        } else {
            parsed.recommendations
        };

        Ok(Interpretation {
            label: classified.label,
            severity: classified.severity,
            text: parsed.text,
            recommendations,
            source: InterpretationSource::LanguageModel,
        })
    }
}

impl Interpreter for BedrockInterpreter {
    fn name(&self) -> &str {
        "bedrock"
    }

    fn explain<'a>(
        &'a self,
        request: &'a InterpretRequest,
    ) -> BoxFuture<'a, Result<Interpretation, InterpretError>> {
        Box::pin(self.ask(request))
    }
}

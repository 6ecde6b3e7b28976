use std::sync::Arc;

use eyre::WrapErr;
use tracing::info;

use psicotest_auth::jwt::TokenSigner;
use psicotest_auth::password::PasswordHasher;
use psicotest_bedrock::BedrockInterpreter;
use psicotest_instruments::interpret::WithFallback;
use psicotest_storage::connection::ConnectionManager;
use psicotest_storage::gateway::Gateway;

use crate::config::ServerConfig;

pub type ScoreInterpreter = WithFallback<BedrockInterpreter>;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub tokens: TokenSigner,
    pub interpreter: Arc<ScoreInterpreter>,
}

impl AppState {
    pub fn new(gateway: Gateway, tokens: TokenSigner, interpreter: ScoreInterpreter) -> Self {
        Self {
            gateway: Arc::new(gateway),
            tokens,
            interpreter: Arc::new(interpreter),
        }
    }

    /// Wire the gateway, token signer and interpreter from configuration.
    /// Does not touch the database; the first probe happens later.
    pub async fn from_config(config: &ServerConfig) -> eyre::Result<Self> {
        let manager = ConnectionManager::new(config.database.clone())
            .wrap_err("invalid DATABASE_URL")?;
        let gateway = Gateway::new(Arc::new(manager), PasswordHasher::default());

        let tokens = TokenSigner::new(config.jwt_secret.as_bytes(), config.token_ttl)
            .wrap_err("invalid JWT_SECRET")?;

        let interpreter = match &config.bedrock_model_id {
            Some(model_id) => {
                let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                info!(model_id = %model_id, "language-model interpretation enabled");
                WithFallback::new(BedrockInterpreter::new(&aws, model_id.clone()))
            }
            None => {
                info!("no BEDROCK_MODEL_ID, using rule-based interpretation only");
                WithFallback::rules_only()
            }
        };

        Ok(Self::new(gateway, tokens, interpreter))
    }
}

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use psicotest_core::models::user::{Role, UserProfile};

use crate::error::AuthError;

pub const MIN_SECRET_LENGTH: usize = 32;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|e| AuthError::InvalidToken(format!("bad subject: {e}")))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Issues and validates HS256 session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::WeakSecret {
                min: MIN_SECRET_LENGTH,
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user: &UserProfile) -> Result<String, AuthError> {
        self.issue_at(user, jiff::Timestamp::now())
    }

    /// Issue a token as if it were `issued_at`.
    pub fn issue_at(&self, user: &UserProfile, issued_at: jiff::Timestamp) -> Result<String, AuthError> {
        let iat = issued_at.as_second();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat,
            exp: iat + self.ttl.as_secs() as i64,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::Jwt(e),
            }
        })?;

        Ok(token_data.claims)
    }
}

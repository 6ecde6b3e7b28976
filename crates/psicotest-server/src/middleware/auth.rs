use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use psicotest_auth::jwt::SessionClaims;
use psicotest_core::models::user::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Session token validation middleware.
///
/// Requests without an `Authorization` header pass through anonymously.
/// A header that is present must carry a valid `Bearer` token; on success
/// [`AuthUser`] is inserted into the request extensions. Routes state their
/// requirement through the [`AuthUser`], [`AdminUser`] and [`MaybeUser`]
/// extractors.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(header) = req.headers().get(AUTHORIZATION) {
        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".to_string()))?;

        let claims = state.tokens.validate(token)?;
        let user = AuthUser::try_from(claims)?;
        req.extensions_mut().insert(user);
    }

    Ok(next.run(req).await)
}

/// Authenticated user extracted from session claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<SessionClaims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))
    }
}

/// The caller, if a valid token was sent.
pub struct MaybeUser(pub Option<AuthUser>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthUser>().cloned()))
    }
}

/// An authenticated caller with the ADMIN role.
pub struct AdminUser(pub AuthUser);

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::Forbidden("administrator role required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

/// Authentication primitives and extractors
///
/// `token` signs and checks access tokens, `password` wraps bcrypt, and
/// [`AuthContext`] is the principal handed to protected handlers.
pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PASSWORD_HASH_COST};
pub use token::{Claims, IssuedToken, TokenKeys, TokenRejection, ACCESS_TOKEN_LIFETIME_HOURS};

use crate::{context::AppContext, error::AppError, metrics};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// Message of every token rejection, whatever the actual reason
pub const TOKEN_REJECTED_MESSAGE: &str = "invalid or missing token";

/// Authenticated principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: i64,
    pub token_id: String,
}

impl From<TokenRejection> for AppError {
    fn from(_: TokenRejection) -> Self {
        AppError::unauthorized(TOKEN_REJECTED_MESSAGE)
    }
}

/// Resolve the principal from an optional bearer token
pub fn authorize(keys: &TokenKeys, bearer: Option<&str>) -> Result<AuthContext, AppError> {
    let Some(token) = bearer else {
        metrics::record_token_verification("missing");
        tracing::debug!(reason = "missing", "Token rejected");
        return Err(AppError::unauthorized(TOKEN_REJECTED_MESSAGE));
    };

    Ok(keys.verify(token)?)
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware on protected routes
        if let Some(principal) = parts.extensions.get::<AuthContext>() {
            return Ok(principal.clone());
        }

        let bearer =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .unwrap_or(None);

        let principal = authorize(
            &state.tokens,
            bearer.as_ref().map(|TypedHeader(auth)| auth.token()),
        )?;
        parts.extensions.insert(principal.clone());

        Ok(principal)
    }
}

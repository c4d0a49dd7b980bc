/// API routes and handlers
pub mod auth;
pub mod health;
pub mod middleware;
pub mod products;
pub mod promotions;
pub mod purchases;
pub mod users;

use crate::{context::AppContext, error::AppError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    Router,
};
use serde::Serialize;

/// Build API routes
///
/// Everything under `/api` sits behind the token gate; login, registration
/// and the health endpoints do not.
pub fn routes(ctx: AppContext) -> Router<AppContext> {
    let protected = Router::new()
        .merge(users::routes())
        .merge(products::routes())
        .merge(promotions::routes())
        .merge(purchases::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            ctx,
            middleware::require_auth,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected)
}

/// Body returned by delete operations
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by update operations
#[derive(Debug, Serialize)]
pub struct UpdatedResponse<T> {
    pub message: String,
    pub data: T,
}

/// Numeric `:id` path segment
///
/// Rejects with the service's JSON error body instead of axum's plain text.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("id must be an integer"))?;

        Ok(RecordId(id))
    }
}

/// Login and registration endpoints
use crate::{
    account::{LoginRequest, RegisterRequest, TokenResponse},
    auth::IssuedToken,
    context::AppContext,
    error::{AppError, AppResult},
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use validator::Validate;

/// Build unauthenticated auth routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

fn token_response(issued: IssuedToken) -> TokenResponse {
    TokenResponse {
        auth: true,
        expires_in: issued.expires_in(),
        token: issued.token,
    }
}

/// Login endpoint
async fn login(
    State(ctx): State<AppContext>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<Json<TokenResponse>> {
    req.validate()?;

    let issued = ctx
        .authenticator
        .authenticate(&req.email, &req.password)
        .await?;

    Ok(Json(token_response(issued)))
}

/// Registration endpoint
async fn register(
    State(ctx): State<AppContext>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let (_, issued) = ctx.authenticator.register(req).await?;

    Ok((StatusCode::CREATED, Json(token_response(issued))))
}

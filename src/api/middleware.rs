/// Request middleware: the token gate and HTTP metrics
use crate::{auth, context::AppContext, error::AppResult, metrics};
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::time::Instant;

/// Require a valid bearer token and add the principal to extensions
///
/// A missing header, a non-Bearer scheme and every kind of bad token all
/// produce the same 401 body.
pub async fn require_auth(
    State(ctx): State<AppContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let principal = auth::authorize(
        &ctx.tokens,
        bearer.as_ref().map(|TypedHeader(header)| header.token()),
    )?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Record request count and latency per matched route
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

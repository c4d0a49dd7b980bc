/// Purchase endpoints
use super::RecordId;
use crate::{
    auth::AuthContext,
    context::AppContext,
    db::models::Purchase,
    error::{AppError, AppResult},
    purchases::CreatePurchaseRequest,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_extra::extract::WithRejection;

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/purchases/purchases",
            get(list_purchases).post(create_purchase),
        )
        .route("/api/purchases/purchases/:id", get(get_purchase))
}

async fn list_purchases(State(ctx): State<AppContext>) -> AppResult<Json<Vec<Purchase>>> {
    Ok(Json(ctx.purchases.list().await?))
}

/// Single purchase, including its details
async fn get_purchase(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> AppResult<Json<Purchase>> {
    Ok(Json(ctx.purchases.get(id).await?))
}

async fn create_purchase(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    WithRejection(Json(req), _): WithRejection<Json<CreatePurchaseRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Purchase>)> {
    let purchase = ctx.purchases.create(req, auth.account_id).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

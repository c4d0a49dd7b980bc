/// Promotional product endpoints
use super::{MessageResponse, RecordId, UpdatedResponse};
use crate::{
    auth::AuthContext,
    catalog::{CreatePromotionRequest, UpdatePromotionRequest},
    context::AppContext,
    db::models::PromotionalProduct,
    error::{AppError, AppResult},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/promotionalproducts/promotionalproducts",
            get(list_promotions),
        )
        .route(
            "/api/promotionalproducts/promotionalproducts/:id",
            get(get_promotion),
        )
        .route(
            "/api/promotionalproducts/promotionalproduct",
            post(create_promotion),
        )
        .route(
            "/api/promotionalproducts/promotionalproduct/:id",
            put(update_promotion).delete(delete_promotion),
        )
}

async fn list_promotions(
    State(ctx): State<AppContext>,
) -> AppResult<Json<Vec<PromotionalProduct>>> {
    Ok(Json(ctx.promotions.list().await?))
}

async fn get_promotion(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> AppResult<Json<PromotionalProduct>> {
    Ok(Json(ctx.promotions.get(id).await?))
}

async fn create_promotion(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    WithRejection(Json(req), _): WithRejection<Json<CreatePromotionRequest>, AppError>,
) -> AppResult<(StatusCode, Json<PromotionalProduct>)> {
    let promotion = ctx.promotions.create(req, auth.account_id).await?;
    Ok((StatusCode::CREATED, Json(promotion)))
}

async fn update_promotion(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    RecordId(id): RecordId,
    WithRejection(Json(req), _): WithRejection<Json<UpdatePromotionRequest>, AppError>,
) -> AppResult<Json<UpdatedResponse<PromotionalProduct>>> {
    let promotion = ctx.promotions.update(id, req, auth.account_id).await?;

    Ok(Json(UpdatedResponse {
        message: "promotional product updated".to_string(),
        data: promotion,
    }))
}

async fn delete_promotion(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> AppResult<Json<MessageResponse>> {
    ctx.promotions.delete(id).await?;
    Ok(Json(MessageResponse::new("promotional product deleted")))
}

/// Product endpoints
use super::{MessageResponse, RecordId, UpdatedResponse};
use crate::{
    auth::AuthContext,
    catalog::{CreateProductRequest, UpdateProductRequest},
    context::AppContext,
    db::models::Product,
    error::{AppError, AppResult},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;

/// Build product routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/products/products", get(list_products))
        .route("/api/products/products/:id", get(get_product))
        .route("/api/products/product", post(create_product))
        .route(
            "/api/products/product/:id",
            put(update_product).delete(delete_product),
        )
}

async fn list_products(State(ctx): State<AppContext>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(ctx.products.list().await?))
}

async fn get_product(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> AppResult<Json<Product>> {
    Ok(Json(ctx.products.get(id).await?))
}

async fn create_product(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    WithRejection(Json(req), _): WithRejection<Json<CreateProductRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = ctx.products.create(req, auth.account_id).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    RecordId(id): RecordId,
    WithRejection(Json(req), _): WithRejection<Json<UpdateProductRequest>, AppError>,
) -> AppResult<Json<UpdatedResponse<Product>>> {
    let product = ctx.products.update(id, req, auth.account_id).await?;

    Ok(Json(UpdatedResponse {
        message: "product updated".to_string(),
        data: product,
    }))
}

async fn delete_product(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> AppResult<Json<MessageResponse>> {
    ctx.products.delete(id).await?;
    Ok(Json(MessageResponse::new("product deleted")))
}

/// User endpoints
use super::{MessageResponse, RecordId, UpdatedResponse};
use crate::{
    account::{AccountChanges, AccountStore, CreateUserRequest, NewAccount, UpdateUserRequest},
    auth::{hash_password, AuthContext},
    context::AppContext,
    db::models::AccountView,
    error::{AppError, AppResult},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/users/users", get(list_users))
        .route("/api/users/user", post(create_user))
        .route(
            "/api/users/user/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

async fn list_users(State(ctx): State<AppContext>) -> AppResult<Json<Vec<AccountView>>> {
    let accounts = ctx.accounts.list().await?;
    Ok(Json(accounts.into_iter().map(AccountView::from).collect()))
}

async fn get_user(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> AppResult<Json<AccountView>> {
    Ok(Json(ctx.accounts.get(id).await?.into()))
}

async fn create_user(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    WithRejection(Json(req), _): WithRejection<Json<CreateUserRequest>, AppError>,
) -> AppResult<(StatusCode, Json<AccountView>)> {
    req.validate()?;

    let password_hash = hash_password(&req.password).await?;
    let account = ctx
        .accounts
        .insert(NewAccount {
            email: req.email,
            password_hash,
            name: req.name,
            paternal_surname: req.paternal_surname,
            maternal_surname: req.maternal_surname,
            active: req.active.unwrap_or(true),
            created_by: Some(auth.account_id),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

async fn update_user(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    RecordId(id): RecordId,
    WithRejection(Json(req), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> AppResult<Json<UpdatedResponse<AccountView>>> {
    req.validate()?;

    let password_hash = match req.password {
        Some(password) => Some(hash_password(&password).await?),
        None => None,
    };

    let account = ctx
        .accounts
        .update(
            id,
            AccountChanges {
                name: req.name,
                password_hash,
                paternal_surname: req.paternal_surname,
                maternal_surname: req.maternal_surname,
                active: req.active,
            },
            auth.account_id,
        )
        .await?;

    Ok(Json(UpdatedResponse {
        message: "user updated".to_string(),
        data: account.into(),
    }))
}

async fn delete_user(
    State(ctx): State<AppContext>,
    RecordId(id): RecordId,
) -> AppResult<Json<MessageResponse>> {
    ctx.accounts.delete(id).await?;
    Ok(Json(MessageResponse::new("user deleted")))
}

/*
 * Responsibility
 * - /users/{user_id} 系 handler (UUID をそのまま扱う、復号化なし)
 * - すべて owner-or-admin: 対象を lookup してから判定する
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::{
            orders::OrderResponse,
            users::{UpdateUserRequest, UserResponse},
        },
        extractors::{AuthCtx, AuthCtxExtractor},
        handlers::{authorize, orders::to_response},
    },
    error::AppError,
    repos::{User, UserChanges},
    services::auth::Capability,
    state::AppState,
};

async fn load_target(
    state: &AppState,
    user_id: Uuid,
    capability: Capability,
    ctx: &AuthCtx,
) -> Result<User, AppError> {
    let user = state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    authorize(capability, ctx, Some(&user.name))?;
    Ok(user)
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = load_target(&state, user_id, Capability::ReadUser, &ctx).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    load_target(&state, user_id, Capability::UpdateUser, &ctx).await?;
    req.validate().map_err(AppError::invalid)?;

    let password_hash = match req.password.as_deref() {
        Some(password) => Some(state.passwords.hash(password)?),
        None => None,
    };

    let user = state
        .users
        .update(
            user_id,
            UserChanges {
                email: req.email,
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user = load_target(&state, user_id, Capability::DeleteUser, &ctx).await?;

    if !state.users.delete(user.id).await? {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(user = %user.name, by = %ctx.user_name, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_orders(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let user = load_target(&state, user_id, Capability::ListUserOrders, &ctx).await?;

    let orders = state.orders.list_by_user(user.id).await?;
    let res = orders
        .into_iter()
        .map(|order| to_response(&state, order))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

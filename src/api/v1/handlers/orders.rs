/*
 * Responsibility
 * - /orders 系 handler
 * - order の id は公開ID (sqids) で受け渡す。生の i64 は出さない
 * - role だけで決まる操作は lookup 前に判定、owner 依存の操作は lookup 後に判定
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::orders::{CreateOrderRequest, DEFAULT_STATUS, OrderResponse, UpdateOrderRequest},
        extractors::{AuthCtxExtractor, public_id::PublicOrderId},
        handlers::authorize,
    },
    error::AppError,
    repos::{NewOrder, Order, OrderChanges},
    services::auth::Capability,
    state::AppState,
};

pub(crate) fn to_response(state: &AppState, order: Order) -> Result<OrderResponse, AppError> {
    Ok(OrderResponse {
        id: state.id_codec.encode(order.id)?,
        description: order.description,
        status: order.status,
        user_id: order.user_id,
    })
}

pub async fn create_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    authorize(Capability::CreateOrder, &ctx, None)?;
    req.validate().map_err(AppError::invalid)?;

    let order = state
        .orders
        .create(NewOrder {
            description: req.description,
            status: req.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            user_id: ctx.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, order)?)))
}

pub async fn get_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    order_id: PublicOrderId,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .orders
        .get(order_id.id)
        .await?
        .ok_or_else(|| AppError::not_found("order"))?;

    let owner = state
        .users
        .get(order.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("order"))?;

    authorize(Capability::ReadOrder, &ctx, Some(&owner.name))?;

    Ok(Json(to_response(&state, order)?))
}

pub async fn update_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    order_id: PublicOrderId,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    authorize(Capability::UpdateOrder, &ctx, None)?;
    req.validate().map_err(AppError::invalid)?;

    let order = state
        .orders
        .update(
            order_id.id,
            OrderChanges {
                description: req.description,
                status: req.status,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("order"))?;

    Ok(Json(to_response(&state, order)?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    order_id: PublicOrderId,
) -> Result<StatusCode, AppError> {
    authorize(Capability::DeleteOrder, &ctx, None)?;

    if !state.orders.delete(order_id.id).await? {
        return Err(AppError::not_found("order"));
    }

    Ok(StatusCode::NO_CONTENT)
}

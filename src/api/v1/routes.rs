/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - どの auth stage をどこに掛けるか:
 *   - /health, /auth/..: identity stage の外 (login だけ login stage を通す)
 *   - /orders/..: identity stage のみ、perimeter gate なし。handler 側で AuthCtx を要求
 *   - /users/..: identity stage + perimeter gate (handler より前に 401)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    auth::{login, register},
    health::health,
    orders::{create_order, delete_order, get_order, update_order},
    users::{delete_user, get_user, list_user_orders, update_user},
};
use crate::middleware::auth::{authentication, authorization, gate};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let login_route = authentication::apply(
        Router::new().route("/login", post(login)),
        state.clone(),
    );
    let auth = Router::new()
        .route("/register", post(register))
        .merge(login_route);

    let orders = Router::new()
        .route("/", post(create_order))
        .route(
            "/{order_id}",
            get(get_order).put(update_order).delete(delete_order),
        );

    let users = gate::apply(
        Router::new()
            .route(
                "/{user_id}",
                get(get_user).put(update_user).delete(delete_user),
            )
            .route("/{user_id}/orders", get(list_user_orders)),
    );

    let protected = authorization::apply(
        Router::new().nest("/orders", orders).nest("/users", users),
        state,
    );

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth)
        .merge(protected)
}

//! Perimeter gate for namespaces that require an identity.
//!
//! Runs after the identity stage. Anonymous requests get 401 here, before
//! any handler or path extraction runs.

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

pub fn apply(router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn(require_authenticated))
}

pub async fn require_authenticated(req: Request<Body>, next: Next) -> Response {
    if req.extensions().get::<AuthCtx>().is_none() {
        tracing::debug!(path = %req.uri().path(), "anonymous request rejected at perimeter");
        return AppError::Unauthorized.into_response();
    }

    next.run(req).await
}

//! Per-request identity: `Authorization: Bearer <jwt>` → `AuthCtx` in extensions.
//!
//! This stage never rejects. A missing header, a foreign scheme, an
//! undecodable or expired token, an unknown subject, or a failed verify all
//! leave the request anonymous and hand it on unchanged. Public routes rely
//! on that. Enforcement happens later: the perimeter gate for non-public
//! namespaces, `AuthCtxExtractor` and the access policy inside handlers.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use chrono::Utc;

use crate::api::v1::extractors::AuthCtx;
use crate::state::AppState;

/// Layer the identity stage over every route of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 `from_fn` cannot take the State extractor; pass it explicitly
    router.layer(middleware::from_fn_with_state(state, authorize))
}

/// Token part of a `Bearer` authorization header, if there is one.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn authorize(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if req.extensions().get::<AuthCtx>().is_some() {
        return next.run(req).await;
    }

    let token = bearer_token(req.headers()).map(str::to_owned);

    if let Some(token) = token
        && let Some(user) = state.auth.resolve_bearer(&token, Utc::now()).await
    {
        tracing::debug!(user = %user.name, role = %user.role, "request authenticated");
        req.extensions_mut()
            .insert(AuthCtx::new(user.id, user.name, user.role));
    }

    next.run(req).await
}

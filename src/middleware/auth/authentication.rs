//! Login stage: credentials in the body → `IssuedToken` in extensions.
//!
//! Runs only in front of the login route. Accepts a JSON body or an
//! urlencoded form. Bad credentials end the request here with 401 and no
//! token. On success the handler renders the body and this stage adds the
//! `Authorization: Bearer <jwt>` response header.

use axum::{
    Form, Router,
    body::{Body, Bytes},
    extract::{FromRequest, State},
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::api::v1::dto::auth::LoginRequest;
use crate::error::AppError;
use crate::state::AppState;

// Credentials are tiny; anything larger is not a login attempt.
const MAX_LOGIN_BODY_BYTES: usize = 16 * 1024;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn is_form(req: &Request<Body>) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

async fn parse_credentials(form: bool, bytes: &Bytes) -> Result<LoginRequest, AppError> {
    if !form {
        return serde_json::from_slice(bytes)
            .map_err(|e| AppError::invalid(format!("malformed login body: {e}")));
    }

    let req = Request::builder()
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(bytes.clone()))
        .map_err(|_| AppError::Internal)?;

    let Form(credentials) = Form::<LoginRequest>::from_request(req, &())
        .await
        .map_err(|e| AppError::invalid(format!("malformed login form: {}", e.body_text())))?;

    Ok(credentials)
}

pub async fn authenticate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let form = is_form(&req);
    let (mut parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_LOGIN_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return AppError::invalid("login body too large").into_response(),
    };

    let credentials = match parse_credentials(form, &bytes).await {
        Ok(credentials) => credentials,
        Err(e) => return e.into_response(),
    };

    let issued = match state
        .auth
        .login(&credentials.name, &credentials.password, Utc::now())
        .await
    {
        Ok(issued) => issued,
        Err(e) => {
            tracing::info!(error = %e, "login rejected");
            return AppError::from(e).into_response();
        }
    };

    tracing::info!(user = %issued.user_name, role = %issued.role, "login succeeded");

    let bearer = HeaderValue::from_str(&format!("Bearer {}", issued.token));
    parts.extensions.insert(issued);

    let mut res = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    if res.status().is_success() {
        match bearer {
            Ok(value) => {
                res.headers_mut().insert(header::AUTHORIZATION, value);
            }
            Err(_) => tracing::error!("issued token is not a valid header value"),
        }
    }

    res
}

/*
 * Responsibility
 * - POST /auth/register: USER アカウントの新規作成
 * - POST /auth/login: login stage が発行済みの token を返すだけ
 */
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::{
        auth::{RegisterRequest, TokenResponse},
        users::UserResponse,
    },
    error::AppError,
    repos::{NewUser, RepoError},
    services::auth::{IssuedToken, Role},
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate().map_err(AppError::invalid)?;

    if state.users.exists_by_name(&req.name).await? {
        return Err(AppError::conflict("user"));
    }

    let password_hash = state.passwords.hash(&req.password)?;

    // The existence check above can race; the unique index has the last word.
    let user = state
        .users
        .create(NewUser {
            name: req.name,
            password_hash,
            email: req.email,
            role: Role::User,
        })
        .await
        .map_err(|e| match e {
            RepoError::Conflict => AppError::conflict("user"),
            e => e.into(),
        })?;

    tracing::info!(user = %user.name, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login(Extension(issued): Extension<IssuedToken>) -> Json<TokenResponse> {
    Json(TokenResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
    })
}

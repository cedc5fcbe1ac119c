/*
 * Responsibility
 * - v1 の handler (resource ごとに 1 ファイル)
 * - `authorize`: policy の判定を 403 に変換する唯一の場所
 */
pub mod auth;
pub mod health;
pub mod orders;
pub mod users;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::Capability;
use crate::services::auth::policy;

pub(crate) fn authorize(
    capability: Capability,
    ctx: &AuthCtx,
    owner_name: Option<&str>,
) -> Result<(), AppError> {
    let decision = policy::decide(
        capability,
        Some(&ctx.user_name),
        ctx.roles(),
        owner_name,
    );

    if decision.is_allowed() {
        return Ok(());
    }

    tracing::info!(
        user = %ctx.user_name,
        role = %ctx.role,
        capability = ?capability,
        "access denied"
    );
    Err(AppError::Forbidden)
}

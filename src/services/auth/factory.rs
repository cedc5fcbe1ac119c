//! Factory: build the auth services from application `Config`.
//!
//! Errors come back as-is so startup reports the actual configuration problem.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::password::PasswordError;
use crate::services::auth::token_codec::TokenError;
use crate::services::auth::{PasswordService, TokenCodec};

pub fn build_token_codec(config: &Config) -> Result<Arc<TokenCodec>, TokenError> {
    let codec = TokenCodec::new(config.jwt_secret.as_bytes(), config.jwt_expiration_seconds)?;
    tracing::info!(
        algorithm = ?codec.algorithm(),
        lifetime_seconds = codec.lifetime_seconds(),
        "token codec ready"
    );

    Ok(Arc::new(codec))
}

pub fn build_password_service(config: &Config) -> Result<Arc<PasswordService>, PasswordError> {
    Ok(Arc::new(PasswordService::new(config.password_params)?))
}

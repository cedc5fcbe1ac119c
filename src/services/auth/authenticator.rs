use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::store::{User, UserRepo};
use crate::services::auth::password::PasswordService;
use crate::services::auth::role::Role;
use crate::services::auth::token_codec::{TokenCodec, TokenError};

#[derive(Debug, Error)]
pub enum AuthError {
    // Unknown name and wrong password are deliberately the same variant.
    #[error("bad credentials")]
    BadCredentials,
    #[error(transparent)]
    Store(#[from] RepoError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::BadCredentials => AppError::Unauthorized,
            AuthError::Store(e) => e.into(),
            AuthError::Token(e) => e.into(),
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user_name: String,
    pub role: Role,
    pub expires_in: u64,
}

/// Login and bearer-token resolution on top of the identity store.
///
/// Both flows share one rule: any failure is local to the request, and a
/// store error is the only thing that is not folded into "not authenticated".
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserRepo>,
    passwords: Arc<PasswordService>,
    tokens: Arc<TokenCodec>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepo>,
        passwords: Arc<PasswordService>,
        tokens: Arc<TokenCodec>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Check `name`/`password` and issue a token carrying the stored role.
    pub async fn login(
        &self,
        name: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let Some(user) = self.users.find_by_name(name).await? else {
            // same Argon2 cost as a wrong password, so timing does not reveal the name
            self.passwords.verify_without_hash(password);
            debug!("login for unknown name");
            return Err(AuthError::BadCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash) {
            debug!(user = %user.name, "login with wrong password");
            return Err(AuthError::BadCredentials);
        }

        let token = self.tokens.issue(&user.name, user.role, now)?;

        Ok(IssuedToken {
            token,
            user_name: user.name,
            role: user.role,
            expires_in: self.tokens.lifetime_seconds(),
        })
    }

    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// Returns `None` for anything short of a fully valid token whose subject
    /// still exists. Store failures are logged and also yield `None`.
    pub async fn resolve_bearer(&self, token: &str, now: DateTime<Utc>) -> Option<User> {
        let subject = match self.tokens.subject_of(token) {
            Ok(subject) => subject,
            Err(err) => {
                debug!(error = %err, "ignoring undecodable bearer token");
                return None;
            }
        };

        if self.tokens.is_expired(token, now) {
            debug!(user = %subject, "ignoring expired bearer token");
            return None;
        }

        let user = match self.users.find_by_name(&subject).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(user = %subject, "bearer token subject no longer exists");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "identity lookup failed; continuing anonymously");
                return None;
            }
        };

        if !self.tokens.verify(token, &user.name, now) {
            return None;
        }

        Some(user)
    }
}

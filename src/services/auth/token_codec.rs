//! Signed access tokens (JWS, HMAC family).
//!
//! The codec is built once from configuration and shared read-only across
//! requests. Nothing is stored server-side: every check re-derives validity
//! from the signature and the `exp` claim against a caller-supplied `now`.
//!
//! Decode failures never escape as panics. Claim accessors return
//! `TokenError`, the boolean checks (`is_expired`, `verify`) fail closed.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::auth::role::Role;

/// Shortest accepted HMAC secret.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret too short: {len} bytes (need at least {min})", min = MIN_SECRET_BYTES)]
    WeakSecret { len: usize },
    #[error("token lifetime must be a positive number of seconds")]
    InvalidLifetime,
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token carries no role")]
    MissingRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    // A list on the wire; a single entry in practice.
    role: Vec<Role>,
    iat: i64,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
}

#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_seconds: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("lifetime_seconds", &self.lifetime_seconds)
            .finish()
    }
}

/// Pick the strongest HMAC variant the secret supports.
fn algorithm_for(secret: &[u8]) -> Result<Algorithm, TokenError> {
    match secret.len() {
        n if n >= 64 => Ok(Algorithm::HS512),
        n if n >= 48 => Ok(Algorithm::HS384),
        n if n >= MIN_SECRET_BYTES => Ok(Algorithm::HS256),
        len => Err(TokenError::WeakSecret { len }),
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], lifetime_seconds: u64) -> Result<Self, TokenError> {
        let algorithm = algorithm_for(secret)?;
        let lifetime_seconds = i64::try_from(lifetime_seconds)
            .ok()
            .filter(|s| *s > 0)
            .ok_or(TokenError::InvalidLifetime)?;

        // Expiry is checked against an explicit `now`, not the library clock.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime_seconds,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn lifetime_seconds(&self) -> u64 {
        self.lifetime_seconds.unsigned_abs()
    }

    /// Issue a token for `name` valid from `now` for the configured lifetime.
    pub fn issue(&self, name: &str, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: name.to_string(),
            role: vec![role],
            iat,
            exp: iat.saturating_add(self.lifetime_seconds),
            jti: Some(Uuid::new_v4().to_string()),
        };

        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)?;
        Ok(token)
    }

    // Signature-checked claims, expiry deliberately not enforced here.
    fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    pub fn subject_of(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.claims(token)?.sub)
    }

    pub fn role_of(&self, token: &str) -> Result<Role, TokenError> {
        self.claims(token)?
            .role
            .first()
            .copied()
            .ok_or(TokenError::MissingRole)
    }

    pub fn is_expired(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.claims(token) {
            Ok(claims) => claims.exp <= now.timestamp(),
            Err(_) => true,
        }
    }

    pub fn verify(&self, token: &str, expected_name: &str, now: DateTime<Utc>) -> bool {
        match self.claims(token) {
            Ok(claims) => claims.sub == expected_name && claims.exp > now.timestamp(),
            Err(_) => false,
        }
    }
}

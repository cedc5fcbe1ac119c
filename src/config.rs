/*
 * Responsibility
 * - 環境変数から設定を読む (.env は dotenvy で対応)
 * - 検証する: 欠落・不正な値は起動失敗にする
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

use thiserror::Error;

use crate::services::auth::PasswordParams;
use crate::services::auth::token_codec::MIN_SECRET_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Account created at startup when it does not exist yet.
/// Registration only ever creates USER accounts.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub password: String,
    pub email: String,
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None: in-memory store (development のみ)
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,

    pub password_params: PasswordParams,

    pub cors_allowed_origins: Vec<String>,
    pub request_body_limit_bytes: usize,
    pub request_timeout_seconds: u64,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secret と DATABASE_URL (password を含みうる) は出さない
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database", &self.database_url.as_ref().map(|_| "postgres"))
            .field("jwt_expiration_seconds", &self.jwt_expiration_seconds)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field(
                "bootstrap_admin",
                &self.bootstrap_admin.as_ref().map(|a| a.name.as_str()),
            )
            .finish_non_exhaustive()
    }
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parsed_or("PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if database_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        let database_max_connections = parsed_or("DATABASE_MAX_CONNECTIONS", 5)?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }
        let jwt_expiration_seconds = parsed_or("JWT_EXPIRATION_SECONDS", 3600)?; // 1 hour
        if jwt_expiration_seconds == 0 {
            return Err(ConfigError::Invalid("JWT_EXPIRATION_SECONDS"));
        }

        let defaults = PasswordParams::default();
        let password_params = PasswordParams {
            memory_kib: parsed_or("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parsed_or("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parsed_or("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_body_limit_bytes = parsed_or("REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let request_timeout_seconds = parsed_or("REQUEST_TIMEOUT_SECONDS", 30)?;

        let sqids_min_length = parsed_or("SQIDS_MIN_LENGTH", 10)?;
        let sqids_alphabet = env::var("SQIDS_ALPHABET").unwrap_or_else(|_| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let bootstrap_admin = match env::var("BOOTSTRAP_ADMIN_NAME").ok() {
            Some(name) if !name.trim().is_empty() => Some(BootstrapAdmin {
                name,
                password: env::var("BOOTSTRAP_ADMIN_PASSWORD")
                    .map_err(|_| ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD"))?,
                email: env::var("BOOTSTRAP_ADMIN_EMAIL").unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Config {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_expiration_seconds,
            password_params,
            cors_allowed_origins,
            request_body_limit_bytes,
            request_timeout_seconds,
            sqids_min_length,
            sqids_alphabet,
            bootstrap_admin,
        })
    }
}

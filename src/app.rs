/*
 * Responsibility
 * - Config読み込み → 依存生成 (store, auth services) → Router 組み立て
 * - HTTP レベルの middleware 適用 (request id, trace, limit, CORS, security headers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{BootstrapAdmin, Config};
use crate::error::AppError;
use crate::middleware;
use crate::repos::{MemoryStore, NewUser, OrderRepo, PgOrderRepo, PgUserRepo, RepoError, UserRepo};
use crate::services::auth::factory::{build_password_service, build_token_codec};
use crate::services::auth::{PasswordService, Role};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,order_service=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development ではプロセスごと落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting order service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}

/// Process-level services, injected into the shared application state.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let (users, orders): (Arc<dyn UserRepo>, Arc<dyn OrderRepo>) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .acquire_timeout(Duration::from_secs(5))
                .connect(url)
                .await
                .context("connecting to postgres")?;
            tracing::info!("using postgres store");
            (
                Arc::new(PgUserRepo::new(pool.clone())),
                Arc::new(PgOrderRepo::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
            let store = MemoryStore::new();
            (Arc::new(store.clone()), Arc::new(store))
        }
    };

    let passwords = build_password_service(config).context("building password hasher")?;
    let tokens = build_token_codec(config).context("building token codec")?;
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)
        .context("building public id codec")?;

    if let Some(admin) = &config.bootstrap_admin {
        ensure_admin(users.as_ref(), &passwords, admin).await?;
    }

    Ok(AppState::new(users, orders, passwords, tokens, id_codec))
}

/// Create the configured ADMIN account unless the name is already taken.
pub async fn ensure_admin(
    users: &dyn UserRepo,
    passwords: &PasswordService,
    admin: &BootstrapAdmin,
) -> Result<(), AppError> {
    if users.exists_by_name(&admin.name).await? {
        tracing::info!(user = %admin.name, "bootstrap admin already present");
        return Ok(());
    }

    let created = users
        .create(NewUser {
            name: admin.name.clone(),
            password_hash: passwords.hash(&admin.password)?,
            email: admin.email.clone(),
            role: Role::Admin,
        })
        .await;

    match created {
        Ok(user) => tracing::info!(user = %user.name, "bootstrap admin created"),
        // 別インスタンスが先に作成した
        Err(RepoError::Conflict) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

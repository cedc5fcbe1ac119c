#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use order_service::app::{build_router, ensure_admin};
use order_service::config::{AppEnv, BootstrapAdmin, Config};
use order_service::repos::MemoryStore;
use order_service::services::auth::{PasswordParams, PasswordService, TokenCodec};
use order_service::services::id_codec::IdCodec;
use order_service::state::AppState;

pub const ADMIN_NAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "root-password";

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

fn test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        app_env: AppEnv::Development,
        database_url: None,
        database_max_connections: 1,
        jwt_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
        jwt_expiration_seconds: 3600,
        // cheap hashing keeps the suite fast
        password_params: PasswordParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        cors_allowed_origins: Vec::new(),
        request_body_limit_bytes: 64 * 1024,
        request_timeout_seconds: 10,
        sqids_min_length: 10,
        sqids_alphabet: ALPHABET.to_string(),
        bootstrap_admin: Some(BootstrapAdmin {
            name: ADMIN_NAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            email: "root@example.com".to_string(),
        }),
    }
}

pub async fn spawn_app() -> TestApp {
    let config = test_config();
    let store = MemoryStore::new();
    let passwords = Arc::new(PasswordService::new(config.password_params).unwrap());
    let tokens = Arc::new(
        TokenCodec::new(config.jwt_secret.as_bytes(), config.jwt_expiration_seconds).unwrap(),
    );
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet).unwrap();

    ensure_admin(&store, &passwords, config.bootstrap_admin.as_ref().unwrap())
        .await
        .unwrap();

    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(store),
        passwords,
        tokens,
        id_codec,
    );

    TestApp {
        router: build_router(state.clone(), &config),
        state,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    /// Registers `name` with password `pw-<name>` and returns the created user.
    pub async fn register(&self, name: &str) -> Value {
        let res = self
            .call(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "password": format!("pw-{name}"),
                    "email": format!("{name}@example.com"),
                })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "register {name}: {:?}", res.body);
        res.body
    }

    pub async fn login(&self, name: &str, password: &str) -> String {
        let res = self
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "name": name, "password": password })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login {name}: {:?}", res.body);
        res.body["token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in; returns (user id, token).
    pub async fn user(&self, name: &str) -> (String, String) {
        let user = self.register(name).await;
        let token = self.login(name, &format!("pw-{name}")).await;
        (user["id"].as_str().unwrap().to_string(), token)
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_NAME, ADMIN_PASSWORD).await
    }

    pub async fn create_order(&self, token: &str, description: &str) -> TestResponse {
        self.call(
            Method::POST,
            "/api/v1/orders",
            Some(token),
            Some(json!({ "description": description })),
        )
        .await
    }
}

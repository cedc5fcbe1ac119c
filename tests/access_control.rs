mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn owner_reads_own_order_and_foreign_user_is_forbidden() {
    let app = spawn_app().await;
    let (alice_id, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;

    let res = app.create_order(&alice, "two books").await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["user_id"], alice_id.as_str());
    assert_eq!(res.body["status"], "CREATED");
    let order_id = res.body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/orders/{order_id}");

    let res = app.call(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["description"], "two books");

    let res = app.call(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn admin_reads_any_order() {
    let app = spawn_app().await;
    let (_, alice) = app.user("alice").await;
    let admin = app.admin_token().await;

    let res = app.create_order(&alice, "lamp").await;
    let order_id = res.body["id"].as_str().unwrap().to_string();

    let res = app
        .call(Method::GET, &format!("/api/v1/orders/{order_id}"), Some(&admin), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn admin_only_operations_reject_user_tokens() {
    let app = spawn_app().await;
    let (_, alice) = app.user("alice").await;

    let res = app.create_order(&alice, "chair").await;
    let uri = format!("/api/v1/orders/{}", res.body["id"].as_str().unwrap());

    let res = app
        .call(Method::PUT, &uri, Some(&alice), Some(json!({"status": "SHIPPED"})))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.call(Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_updates_and_deletes_orders() {
    let app = spawn_app().await;
    let (_, alice) = app.user("alice").await;
    let admin = app.admin_token().await;

    let res = app.create_order(&alice, "desk").await;
    let uri = format!("/api/v1/orders/{}", res.body["id"].as_str().unwrap());

    let res = app
        .call(Method::PUT, &uri, Some(&admin), Some(json!({"status": "SHIPPED"})))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "SHIPPED");
    assert_eq!(res.body["description"], "desk");

    let res = app.call(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.call(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_cannot_create_orders() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let res = app.create_order(&admin, "nope").await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_requests_are_unauthorized() {
    let app = spawn_app().await;
    let (alice_id, alice) = app.user("alice").await;
    let res = app.create_order(&alice, "pen").await;
    let order_uri = format!("/api/v1/orders/{}", res.body["id"].as_str().unwrap());

    let cases = [
        (Method::GET, format!("/api/v1/users/{alice_id}")),
        (Method::GET, format!("/api/v1/users/{alice_id}/orders")),
        (Method::DELETE, format!("/api/v1/users/{alice_id}")),
        (Method::GET, order_uri.clone()),
        (Method::DELETE, order_uri),
    ];
    for (method, uri) in cases {
        let res = app.call(method.clone(), &uri, None, None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(res.body["error"]["code"], "UNAUTHORIZED");
    }

    let res = app
        .call(Method::POST, "/api/v1/orders", None, Some(json!({"description": "x"})))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_bearer_is_treated_as_anonymous() {
    let app = spawn_app().await;
    let (alice_id, alice) = app.user("alice").await;

    let mut tampered = alice.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    for token in ["garbage", tampered.as_str()] {
        let res = app
            .call(Method::GET, &format!("/api/v1/users/{alice_id}"), Some(token), None)
            .await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    }

    // public routes are unaffected by a bad token
    let res = app.call(Method::GET, "/api/v1/health", Some("garbage"), None).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn user_profile_is_owner_or_admin() {
    let app = spawn_app().await;
    let (alice_id, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;
    let admin = app.admin_token().await;
    let uri = format!("/api/v1/users/{alice_id}");

    let res = app.call(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "alice");

    let res = app.call(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .call(Method::PUT, &uri, Some(&bob), Some(json!({"email": "bob@evil.com"})))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .call(Method::PUT, &uri, Some(&admin), Some(json!({"email": "alice@new.com"})))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["email"], "alice@new.com");
}

#[tokio::test]
async fn not_found_comes_before_forbidden_for_owner_operations() {
    let app = spawn_app().await;
    let (_, alice) = app.user("alice").await;

    let missing_user = format!("/api/v1/users/{}", uuid::Uuid::new_v4());
    let res = app.call(Method::GET, &missing_user, Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let missing_order = format!(
        "/api/v1/orders/{}",
        app.state.id_codec.encode(999_999).unwrap()
    );
    let res = app.call(Method::GET, &missing_order, Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // role-only operations decide first
    let res = app.call(Method::DELETE, &missing_order, Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let res = app.call(Method::DELETE, &missing_order, Some(&admin), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_order_id_is_400() {
    let app = spawn_app().await;
    let (_, alice) = app.user("alice").await;
    let res = app
        .call(Method::GET, "/api/v1/orders/not*an*id", Some(&alice), None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_user_orders_returns_only_that_users_orders() {
    let app = spawn_app().await;
    let (alice_id, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;

    app.create_order(&alice, "a1").await;
    app.create_order(&alice, "a2").await;
    app.create_order(&bob, "b1").await;

    let uri = format!("/api/v1/users/{alice_id}/orders");
    let res = app.call(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::OK);
    let orders = res.body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["user_id"] == alice_id.as_str()));

    let res = app.call(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_a_user_removes_their_orders_and_identity() {
    let app = spawn_app().await;
    let (alice_id, alice) = app.user("alice").await;
    let admin = app.admin_token().await;

    let res = app.create_order(&alice, "gone soon").await;
    let order_uri = format!("/api/v1/orders/{}", res.body["id"].as_str().unwrap());

    let res = app
        .call(Method::DELETE, &format!("/api/v1/users/{alice_id}"), Some(&admin), None)
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.call(Method::GET, &order_uri, Some(&admin), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // the token outlives the account but no longer resolves to anyone
    let res = app.create_order(&alice, "ghost").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

//! Persistence contracts the rest of the service depends on.
//!
//! Handlers and the auth pipeline only ever see these traits; the Postgres
//! and in-memory implementations live next to them. Implementations must be
//! safe to share across request tasks (`Send + Sync`).
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::services::auth::role::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub role: Role,
}

/// Partial profile update. `None` leaves the column untouched.
/// Name and role are not updatable.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub description: String,
    pub status: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub description: String,
    pub status: String,
    pub user_id: Uuid,
}

/// Partial order update. The owner is fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub description: Option<String>,
    pub status: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<User>>;

    async fn exists_by_name(&self, name: &str) -> RepoResult<bool>;

    async fn get(&self, id: Uuid) -> RepoResult<Option<User>>;

    // Returns `RepoError::Conflict` when the name is taken.
    async fn create(&self, new_user: NewUser) -> RepoResult<User>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> RepoResult<Option<User>>;

    // Also removes the user's orders.
    async fn delete(&self, id: Uuid) -> RepoResult<bool>;
}

#[async_trait]
pub trait OrderRepo: Send + Sync {
    async fn create(&self, new_order: NewOrder) -> RepoResult<Order>;

    async fn get(&self, id: i64) -> RepoResult<Option<Order>>;

    async fn update(&self, id: i64, changes: OrderChanges) -> RepoResult<Option<Order>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;

    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Order>>;
}

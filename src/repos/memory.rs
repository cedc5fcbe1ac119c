//! In-process store backing both repo traits.
//!
//! Used when no `DATABASE_URL` is configured in development, and by tests.
//! It mirrors the Postgres constraints that matter to callers: unique user
//! names (`Conflict`) and cascading order deletion.
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{
    NewOrder, NewUser, Order, OrderChanges, OrderRepo, User, UserChanges, UserRepo,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    orders: BTreeMap<i64, Order>,
    last_order_id: i64,
}

/// Cheap to clone; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.name == name).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.name == name))
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.name == new_user.name) {
            return Err(RepoError::Conflict);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            password_hash: new_user.password_hash,
            email: new_user.email,
            role: new_user.role,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> RepoResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.orders.retain(|_, order| order.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl OrderRepo for MemoryStore {
    async fn create(&self, new_order: NewOrder) -> RepoResult<Order> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new_order.user_id) {
            return Err(RepoError::Corrupt(format!(
                "orders.user_id {} has no user",
                new_order.user_id
            )));
        }

        tables.last_order_id += 1;
        let now = Utc::now();
        let order = Order {
            id: tables.last_order_id,
            description: new_order.description,
            status: new_order.status,
            user_id: new_order.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: OrderChanges) -> RepoResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        let Some(order) = tables.orders.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(description) = changes.description {
            order.description = description;
        }
        if let Some(status) = changes.status {
            order.status = status;
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.remove(&id).is_some())
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

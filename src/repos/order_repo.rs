/*
 * Responsibility
 * - orders の CRUD (SQLx)
 * - user_id の FK は ON DELETE CASCADE: user 削除でその orders も消える
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::repos::store::{NewOrder, Order, OrderChanges, OrderRepo};

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    description: String,
    status: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            description: row.description,
            status: row.status,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgOrderRepo {
    pool: PgPool,
}

impl PgOrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepo for PgOrderRepo {
    async fn create(&self, new_order: NewOrder) -> RepoResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (description, status, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, description, status, user_id, created_at, updated_at
            "#,
        )
        .bind(&new_order.description)
        .bind(&new_order.status)
        .bind(new_order.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, description, status, user_id, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    async fn update(&self, id: i64, changes: OrderChanges) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders
            SET
                description = COALESCE($2, description),
                status = COALESCE($3, status),
                updated_at = now()
            WHERE id = $1
            RETURNING id, description, status, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.description)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, description, status, user_id, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}

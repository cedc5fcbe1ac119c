/*
 * Responsibility
 * - users テーブルを SQLx で扱う (identity store)
 * - 想定カラム:
 *   - users.id (uuid, default gen_random_uuid())
 *   - users.name (text, unique)
 *   - users.password_hash (text)
 *   - users.email (text)
 *   - users.role (text: USER | ADMIN)
 *   - users.created_at (timestamptz, default now())
 * - orders.user_id は users.id を ON DELETE CASCADE で参照
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{NewUser, User, UserChanges, UserRepo};

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    password_hash: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| RepoError::Corrupt(format!("users.role for {}: {e}", row.id)))?;

        Ok(User {
            id: row.id,
            name: row.name,
            password_hash: row.password_hash,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, password_hash, email, role, created_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE name = $1)
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, password_hash, email, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, password_hash, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, password_hash, email, role, created_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .bind(new_user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        User::try_from(row)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash)
            WHERE id = $1
            RETURNING id, name, password_hash, email, role, created_at
            "#,
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

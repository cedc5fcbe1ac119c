/*
 * Responsibility
 * - users の request/response DTO
 * - response に password hash は絶対に含めない
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::dto::auth::{validate_email, validate_password};
use crate::repos::store::User;
use crate::services::auth::Role;

/// Profile update. Name and role are fixed after registration.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.is_none() && self.password.is_none() {
            return Err("nothing to update");
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

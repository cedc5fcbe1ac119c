/*
 * Responsibility
 * - orders の request/response DTO
 * - `id` はエンコード済み (公開ID) で返す。内部IDは外に出さない
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_DESCRIPTION_LEN: usize = 1024;
const MAX_STATUS_LEN: usize = 32;

pub const DEFAULT_STATUS: &str = "CREATED";

fn validate_status(status: &str) -> Result<(), &'static str> {
    if status.trim().is_empty() {
        return Err("status cannot be empty");
    }
    if status.len() > MAX_STATUS_LEN {
        return Err("status must be <= 32 chars");
    }
    Ok(())
}

/// The owner of a new order is always the caller.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub description: String,
    pub status: Option<String>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.description.trim().is_empty() {
            return Err("description is required");
        }
        if self.description.len() > MAX_DESCRIPTION_LEN {
            return Err("description must be <= 1024 chars");
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub description: Option<String>,
    pub status: Option<String>,
}

impl UpdateOrderRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(description) = &self.description
            && description.trim().is_empty()
        {
            return Err("description cannot be empty");
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String, // encoded
    pub description: String,
    pub status: String,
    pub user_id: Uuid,
}

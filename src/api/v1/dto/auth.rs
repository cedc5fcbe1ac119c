/*
 * Responsibility
 * - register / login の request・response DTO
 */
use serde::{Deserialize, Serialize};

const MAX_NAME_LEN: usize = 64;
const MAX_PASSWORD_LEN: usize = 256;
const MAX_EMAIL_LEN: usize = 256;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    pub email: String,
}

pub(crate) fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("password is required");
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err("password must be <= 256 chars");
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("email must contain '@'");
    };
    if local.is_empty() || domain.is_empty() {
        return Err("email must contain '@'");
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err("email must be <= 256 chars");
    }
    Ok(())
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.trim() != self.name {
            return Err("name must not have surrounding whitespace");
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err("name must be <= 64 chars");
        }
        validate_password(&self.password)?;
        validate_email(&self.email)?;

        Ok(())
    }
}

/// Login credentials.
///
/// Accepted as JSON (`{"name", "password"}`) or as an urlencoded form
/// (`username=..&password=..`); `username` is an alias of `name` in both.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, password: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(register("alice", "pw1", "a@x.com").validate().is_ok());
    }

    #[test]
    fn rejects_bad_registration() {
        assert!(register("", "pw1", "a@x.com").validate().is_err());
        assert!(register(" alice", "pw1", "a@x.com").validate().is_err());
        assert!(register("alice", "", "a@x.com").validate().is_err());
        assert!(register("alice", "pw1", "ax.com").validate().is_err());
        assert!(register("alice", "pw1", "@x.com").validate().is_err());
        assert!(register(&"a".repeat(65), "pw1", "a@x.com").validate().is_err());
    }

    #[test]
    fn login_accepts_username_alias() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"pw1"}"#).unwrap();
        assert_eq!(req.name, "alice");
    }
}

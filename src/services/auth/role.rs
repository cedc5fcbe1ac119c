//! Closed set of roles an identity can hold.
//!
//! Roles travel in three places: the `users.role` column (text), the `role`
//! claim of issued tokens, and the request-scoped `AuthCtx`. All three use
//! the same upper-case spelling (`USER`, `ADMIN`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Authority string in the `ROLE_<NAME>` form clients of the API expect.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_spelling() {
        assert_eq!("USER".parse::<Role>(), Ok(Role::User));
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
    }

    #[test]
    fn rejects_authority_form_and_lowercase() {
        assert!("ROLE_ADMIN".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_upper_case() {
        let json = serde_json::to_string(&vec![Role::User, Role::Admin]).unwrap();
        assert_eq!(json, r#"["USER","ADMIN"]"#);
    }

    #[test]
    fn authority_has_role_prefix() {
        assert_eq!(Role::Admin.authority(), "ROLE_ADMIN");
    }
}

//! Password hashing and verification (Argon2id, PHC string format).
//!
//! Verification reads the cost parameters from the stored PHC string, so
//! changing the configured cost only affects newly hashed passwords.

use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),
    #[error("salt generation failed: {0}")]
    Salt(String),
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
}

/// Argon2 cost knobs, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct PasswordParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    // Hash of a throwaway password at the configured cost, checked against
    // when there is no stored hash so both paths cost the same.
    decoy_hash: String,
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService").finish_non_exhaustive()
    }
}

impl PasswordService {
    pub fn new(params: PasswordParams) -> Result<Self, PasswordError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(PasswordError::Params)?;

        let mut service = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy_hash: String::new(),
        };
        service.decoy_hash = service.hash("decoy-password-never-assigned")?;

        Ok(service)
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::fill(&mut salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;

        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?
            .to_string();
        Ok(phc)
    }

    /// Constant-time compare of `password` against a stored PHC hash.
    /// An unparsable stored hash never matches.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Spend one full verification on a password that has no stored hash.
    ///
    /// Login calls this for unknown names so they take as long as a wrong
    /// password.
    pub fn verify_without_hash(&self, password: &str) {
        std::hint::black_box(self.verify(password, &self.decoy_hash));
    }

    pub(crate) fn decoy_hash(&self) -> &str {
        &self.decoy_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordService {
        PasswordService::new(PasswordParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let passwords = cheap();
        let hash = passwords.hash("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(passwords.verify("pw1", &hash));
        assert!(!passwords.verify("pw2", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let passwords = cheap();
        let a = passwords.hash("pw1").unwrap();
        let b = passwords.hash("pw1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_matches() {
        let passwords = cheap();
        assert!(!passwords.verify("pw1", "pw1"));
        assert!(!passwords.verify("", ""));
    }

    #[test]
    fn rejects_invalid_params() {
        let err = PasswordService::new(PasswordParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        });
        assert!(matches!(err, Err(PasswordError::Params(_))));
    }

    #[test]
    fn decoy_hash_uses_configured_cost() {
        let passwords = cheap();
        let parsed = PasswordHash::new(passwords.decoy_hash()).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert_eq!(parsed.params.get_decimal("m"), Some(1024));
        assert_eq!(parsed.params.get_decimal("t"), Some(1));
        assert_eq!(parsed.params.get_decimal("p"), Some(1));
    }

    #[test]
    fn decoy_hash_is_a_real_argon2_hash() {
        let passwords = cheap();
        assert!(passwords.verify("decoy-password-never-assigned", passwords.decoy_hash()));
        assert!(!passwords.verify("pw1", passwords.decoy_hash()));
    }
}

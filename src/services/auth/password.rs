//! Password hashing (bcrypt, modular crypt format `$2b$<cost>$...`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[source] bcrypt::BcryptError),
    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// bcrypt hasher with a fixed work factor.
///
/// The cost only affects new hashes; `verify_password` reads the cost
/// embedded in the stored hash.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plain, self.cost).map_err(PasswordError::Hash)
    }
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plain, stored_hash).map_err(|_| PasswordError::MalformedHash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn hash_then_verify() {
        let hash = hasher().hash("my_secure_password").unwrap();
        assert_ne!(hash, "my_secure_password");
        assert!(hash.starts_with("$2b$04$"));
        assert!(verify_password("my_secure_password", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let a = hasher().hash("password").unwrap();
        let b = hasher().hash("password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("password", "plaintext"),
            Err(PasswordError::MalformedHash)
        ));
    }

    #[test]
    fn out_of_range_cost_fails() {
        assert!(matches!(
            PasswordHasher::new(2).hash("password"),
            Err(PasswordError::Hash(_))
        ));
    }
}

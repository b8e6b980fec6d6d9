use crate::error::AppError;
use bcrypt::DEFAULT_COST;

/// One-way salted hashing and verification of credentials. Swappable so
/// tests can trade hashing cost for speed without touching callers.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AppError>;
    fn verify(&self, hashed: &str, plaintext: &str) -> Result<(), AppError>;
}

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// `bcrypt::MIN_COST` (4) is the floor; tests use it to stay fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    // bcrypt recomputes the digest and compares in constant time. Any
    // failure, including a malformed stored hash, reads as a mismatch.
    fn verify(&self, hashed: &str, plaintext: &str) -> Result<(), AppError> {
        match bcrypt::verify(plaintext, hashed) {
            Ok(true) => Ok(()),
            _ => Err(AppError::IncorrectCredential),
        }
    }
}

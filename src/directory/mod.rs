pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Role, User};

pub use memory::InMemoryUserDirectory;
pub use postgres::PgUserDirectory;

/// A user record as handed to the directory for persistence. The directory
/// assigns the final identifier.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Persists user records and exclusively owns them; callers hold no cached
/// copies across requests. Consistency across concurrent calls is whatever
/// the backing store provides.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Stores the user and returns it with its assigned id.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    async fn get_by_username(&self, username: &str) -> Result<User, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<User, AppError>;

    /// Sets the target user's role to admin. Idempotent.
    async fn update_role_to_admin(&self, id: &str) -> Result<(), AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
}

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{NewUser, UserDirectory};
use crate::error::AppError;
use crate::models::{Role, User};

/// Map-backed directory for tests. Keys are generated UUID strings, so ids
/// look the same as the production directory's.
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let created = User {
            id: Uuid::new_v4().to_string(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };

        self.users
            .write()
            .expect("user directory lock poisoned")
            .insert(created.id.clone(), created.clone());

        Ok(created)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, AppError> {
        self.users
            .read()
            .expect("user directory lock poisoned")
            .values()
            .find(|user| user.username == username)
            .cloned()
            .ok_or(AppError::UserNotFound)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, AppError> {
        self.users
            .read()
            .expect("user directory lock poisoned")
            .get(id)
            .cloned()
            .ok_or(AppError::UserNotFound)
    }

    async fn update_role_to_admin(&self, id: &str) -> Result<(), AppError> {
        let mut users = self.users.write().expect("user directory lock poisoned");
        let user = users.get_mut(id).ok_or(AppError::UserNotFound)?;
        user.role = Role::Admin;
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self
            .users
            .read()
            .expect("user directory lock poisoned")
            .len() as i64)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self
            .users
            .read()
            .expect("user directory lock poisoned")
            .values()
            .any(|user| user.username == username))
    }
}

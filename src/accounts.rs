//!
//! # Account Management
//!
//! The `AccountManager` orchestrates registration, login, lookup, and
//! promotion over its injected collaborators: the user directory, the
//! password hasher, and the token service. It holds no user state of its
//! own across requests.

use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::directory::{NewUser, UserDirectory};
use crate::error::AppError;
use crate::models::{Role, User};

#[derive(Clone)]
pub struct AccountManager {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AccountManager {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            directory,
            hasher,
            tokens,
        }
    }

    /// Creates a new account and returns the stored user with its
    /// directory-assigned id and role. Only the password hash is persisted.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        if self.directory.username_exists(username).await? {
            return Err(AppError::UsernameTaken);
        }

        let password_hash = self.hasher.hash(password)?;

        // The first user registered into an empty directory becomes the
        // admin. Count-then-create is not atomic: two concurrent first
        // registrations can both observe an empty directory and both be
        // granted admin.
        let role = if self.directory.count().await? == 0 {
            Role::Admin
        } else {
            Role::User
        };

        let user = self
            .directory
            .create(NewUser {
                username: username.to_owned(),
                password_hash,
                role,
            })
            .await?;

        log::info!(
            "registered user '{}' (id {}) with role {}",
            user.username,
            user.id,
            user.role
        );
        Ok(user)
    }

    /// Verifies the credentials and issues a token carrying the user's
    /// current id, username, and role.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        log::info!("login attempt for username '{}'", username);

        let user = self.directory.get_by_username(username).await?;

        if let Err(err) = self.hasher.verify(&user.password_hash, password) {
            log::warn!("login failed for username '{}': invalid password", username);
            return Err(err);
        }

        log::info!(
            "user '{}' (id {}, role {}) successfully authenticated",
            user.username,
            user.id,
            user.role
        );

        self.tokens.issue(&user)
    }

    /// Invoked by the access-control gate on every protected request; a
    /// plain pass-through lookup with no side effects.
    pub async fn get_user_by_id(&self, id: &str) -> Result<User, AppError> {
        self.directory.get_by_id(id).await
    }

    /// Promotes the target user to admin. Idempotent.
    pub async fn promote(&self, id: &str) -> Result<(), AppError> {
        self.directory.update_role_to_admin(id).await?;
        log::info!("user {} promoted to admin", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::BcryptHasher;
    use crate::auth::token::{JwtTokenService, TokenService};
    use crate::directory::InMemoryUserDirectory;

    // bcrypt's MIN_COST constant is not exported; inline its value (4),
    // as documented on `BcryptHasher::with_cost`, to keep tests fast.
    const MIN_COST: u32 = 4;

    fn manager() -> (AccountManager, Arc<JwtTokenService>) {
        let tokens = Arc::new(JwtTokenService::new("account-manager-test-secret"));
        let manager = AccountManager::new(
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(BcryptHasher::with_cost(MIN_COST)),
            tokens.clone(),
        );
        (manager, tokens)
    }

    #[actix_rt::test]
    async fn test_first_registration_grants_admin() {
        let (manager, _) = manager();

        let alice = manager.register("alice", "pw1").await.unwrap();
        assert_eq!(alice.role, Role::Admin);
        assert!(!alice.id.is_empty());

        let bob = manager.register("bob", "pw2").await.unwrap();
        assert_eq!(bob.role, Role::User);
    }

    #[actix_rt::test]
    async fn test_duplicate_username_is_rejected_without_a_write() {
        let (manager, _) = manager();

        manager.register("alice", "pw1").await.unwrap();
        assert!(matches!(
            manager.register("alice", "other").await,
            Err(AppError::UsernameTaken)
        ));

        // The rejected registration must not have persisted anything: the
        // next distinct registration is the second user, not the third.
        let bob = manager.register("bob", "pw2").await.unwrap();
        assert_eq!(bob.role, Role::User);
    }

    #[actix_rt::test]
    async fn test_login_issues_token_with_current_role() {
        let (manager, tokens) = manager();

        let alice = manager.register("alice", "pw1").await.unwrap();
        let token = manager.login("alice", "pw1").await.unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, alice.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
    }

    #[actix_rt::test]
    async fn test_login_failures_are_distinguishable() {
        let (manager, _) = manager();
        manager.register("alice", "pw1").await.unwrap();

        assert!(matches!(
            manager.login("alice", "wrong").await,
            Err(AppError::IncorrectCredential)
        ));
        assert!(matches!(
            manager.login("nobody", "pw1").await,
            Err(AppError::UserNotFound)
        ));
    }

    #[actix_rt::test]
    async fn test_promotion_changes_later_tokens() {
        let (manager, tokens) = manager();

        manager.register("alice", "pw1").await.unwrap();
        let bob = manager.register("bob", "pw2").await.unwrap();

        manager.promote(&bob.id).await.unwrap();
        // Idempotent: promoting an admin again succeeds.
        manager.promote(&bob.id).await.unwrap();

        let token = manager.login("bob", "pw2").await.unwrap();
        assert_eq!(tokens.verify(&token).unwrap().role, Role::Admin);
    }

    #[actix_rt::test]
    async fn test_promoting_missing_user_fails() {
        let (manager, _) = manager();

        assert!(matches!(
            manager.promote("no-such-id").await,
            Err(AppError::UserNotFound)
        ));
    }

    #[actix_rt::test]
    async fn test_lookup_is_a_pass_through() {
        let (manager, _) = manager();
        let alice = manager.register("alice", "pw1").await.unwrap();

        let found = manager.get_user_by_id(&alice.id).await.unwrap();
        assert_eq!(found.username, "alice");

        assert!(matches!(
            manager.get_user_by_id("missing").await,
            Err(AppError::UserNotFound)
        ));
    }
}

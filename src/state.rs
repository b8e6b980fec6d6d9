use std::sync::Arc;

use crate::accounts::AccountManager;
use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::directory::UserDirectory;
use crate::store::TaskStore;

/// Shared application state. Every collaborator is constructed once at
/// startup and injected here; handlers and the access-control gate reach
/// them through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountManager,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        tasks: Arc<dyn TaskStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts: AccountManager::new(directory, hasher, Arc::clone(&tokens)),
            tasks,
            tokens,
        }
    }
}

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Task, TaskInput};

pub use memory::InMemoryTaskStore;
pub use postgres::PgTaskStore;

/// Key-value-like persistence for tasks: create, read, update, and delete
/// by identifier. Handlers pass requests straight through; there is no
/// task logic beyond storage.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, input: TaskInput) -> Result<Task, AppError>;

    /// Newest first.
    async fn get_all(&self) -> Result<Vec<Task>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Task, AppError>;

    async fn update(&self, id: &str, input: TaskInput) -> Result<Task, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::TaskStore;
use crate::error::AppError;
use crate::models::{Task, TaskInput};

/// Map-backed task store for tests.
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, input: TaskInput) -> Result<Task, AppError> {
        let task = Task::new(input);

        self.tasks
            .write()
            .expect("task store lock poisoned")
            .insert(task.id.clone(), task.clone());

        Ok(task)
    }

    async fn get_all(&self) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().expect("task store lock poisoned");

        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get_by_id(&self, id: &str) -> Result<Task, AppError> {
        self.tasks
            .read()
            .expect("task store lock poisoned")
            .get(id)
            .cloned()
            .ok_or(AppError::TaskNotFound)
    }

    async fn update(&self, id: &str, input: TaskInput) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().expect("task store lock poisoned");
        let task = tasks.get_mut(id).ok_or(AppError::TaskNotFound)?;

        task.title = input.title;
        task.description = input.description;
        task.due_date = input.due_date;
        task.status = input.status;
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.tasks
            .write()
            .expect("task store lock poisoned")
            .remove(id)
            .map(|_| ())
            .ok_or(AppError::TaskNotFound)
    }
}

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{NewTask, NewUser, Page, Task, TaskFilter, TaskUpdate, User};

#[derive(Default)]
struct Tables {
    next_user_id: i32,
    users: HashMap<i32, User>,
    // Insertion order, so listings are stable like `ORDER BY created_at`.
    tasks: Vec<Task>,
}

/// In-process store with the same semantics as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                field: "email".into(),
            });
        }

        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            name: user.name,
            email: user.email,
            password: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let task = Task::new(task);
        self.tables.write().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(
        &self,
        owner_id: i32,
        filter: &TaskFilter,
        page: Page,
    ) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.owner_id == owner_id && !t.is_deleted && filter.matches(t))
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .find(|t| t.id == id && !t.is_deleted)
            .cloned())
    }

    async fn find_owned_task(&self, id: Uuid, owner_id: i32) -> StoreResult<Option<Task>> {
        Ok(self
            .find_task(id)
            .await?
            .filter(|task| task.owner_id == owner_id))
    }

    async fn update_task(&self, id: Uuid, update: &TaskUpdate) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && !t.is_deleted)
            .ok_or(StoreError::NotFound)?;
        task.apply(update);
        Ok(task.clone())
    }

    async fn soft_delete_task(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && !t.is_deleted)
            .ok_or(StoreError::NotFound)?;
        task.is_deleted = true;
        task.updated_at = Utc::now();
        Ok(())
    }
}

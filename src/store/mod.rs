//! Persistence boundary for users and tasks.
//!
//! Request handlers only see the [`Store`] trait. [`PgStore`] backs it with Postgres;
//! [`MemoryStore`] keeps everything in process and is used by the test suite and by
//! deployments that run without a `DATABASE_URL`.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewTask, NewUser, Page, Task, TaskFilter, TaskUpdate, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. `field` names the offending column.
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data access used by the auth flow and the task handlers.
///
/// Every task read except [`Store::find_task`] is scoped to an owner, and no read ever
/// returns a soft-deleted task.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by the health check.
    fn kind(&self) -> &'static str;

    /// Inserts a user. Fails with `UniqueViolation { field: "email" }` on a taken email.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn create_task(&self, task: NewTask) -> StoreResult<Task>;

    /// Live tasks of `owner_id` matching `filter`, oldest first, one page at a time.
    async fn list_tasks(
        &self,
        owner_id: i32,
        filter: &TaskFilter,
        page: Page,
    ) -> StoreResult<Vec<Task>>;

    /// Looks a live task up by id alone. Used by the ownership gate.
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    async fn find_owned_task(&self, id: Uuid, owner_id: i32) -> StoreResult<Option<Task>>;

    /// Applies the supplied fields. Fails with `NotFound` if the task is gone.
    async fn update_task(&self, id: Uuid, update: &TaskUpdate) -> StoreResult<Task>;

    /// Flips `is_deleted`. Fails with `NotFound` if the task is already deleted.
    async fn soft_delete_task(&self, id: Uuid) -> StoreResult<()>;
}

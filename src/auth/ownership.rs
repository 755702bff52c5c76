use uuid::Uuid;

use crate::error::AppError;
use crate::models::Task;
use crate::store::Store;

/// Mutation being authorized. Only used to word the 403 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Update,
    Delete,
}

impl TaskAction {
    fn verb(self) -> &'static str {
        match self {
            TaskAction::Update => "update",
            TaskAction::Delete => "delete",
        }
    }
}

/// Fetch-then-check gate applied before a task is mutated.
///
/// A missing or soft-deleted task is 404 for everyone; a live task owned by someone
/// else is 403. The returned task is the one the caller may now mutate.
pub async fn authorize_task(
    store: &dyn Store,
    task_id: Uuid,
    requester_id: i32,
    action: TaskAction,
) -> Result<Task, AppError> {
    let task = store
        .find_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.owner_id != requester_id {
        log::warn!(
            "User {} attempted to {} task {} owned by {}",
            requester_id,
            action.verb(),
            task_id,
            task.owner_id
        );
        return Err(AppError::Forbidden(format!(
            "You do not have permission to {} this task",
            action.verb()
        )));
    }

    Ok(task)
}

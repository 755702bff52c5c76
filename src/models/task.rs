use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Completed,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be at least 3 characters.
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    /// An optional description for the task.
    pub description: Option<String>,

    /// Defaults to `MEDIUM` when omitted.
    pub priority: Option<TaskPriority>,

    /// Defaults to `PENDING` when omitted.
    pub status: Option<TaskStatus>,
}

impl TaskInput {
    /// Binds the input to its creator, filling in defaults for omitted enums.
    pub fn into_new_task(self, owner_id: i32) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            priority: self.priority.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            owner_id,
        }
    }
}

/// Partial update of a task. Only the supplied fields change; the owner is not writable.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 3, max = 20))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

/// A task ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub owner_id: i32,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Identifier of the user who created the task. Never changes.
    pub owner_id: i32,
    /// Soft-delete marker. Deleted tasks are invisible to every read path.
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new live `Task` with a fresh id and timestamps.
    pub fn new(new_task: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new_task.title,
            description: new_task.description,
            priority: new_task.priority,
            status: new_task.status,
            owner_id: new_task.owner_id,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Query string accepted by the task listing endpoint.
///
/// Only pagination and the allow-listed equality filters are accepted; any other
/// field fails deserialization so callers cannot probe columns such as the owner.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskQuery {
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    pub title: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskQuery {
    pub fn into_parts(self) -> (TaskFilter, Page) {
        let page = Page {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(Page::DEFAULT_LIMIT),
        };
        let filter = TaskFilter {
            title: self.title.filter(|title| !title.is_empty()),
            priority: self.priority,
            status: self.status,
        };
        (filter, page)
    }
}

/// Equality filters applied on top of the owner and soft-delete scoping.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskFilter {
    pub title: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.title.as_ref().map_or(true, |title| &task.title == title)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self.status.map_or(true, |status| task.status == status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

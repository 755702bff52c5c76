pub mod task;
pub mod user;

pub use task::{
    NewTask, Page, Task, TaskFilter, TaskInput, TaskPriority, TaskQuery, TaskStatus, TaskUpdate,
};
pub use user::{NewUser, User};

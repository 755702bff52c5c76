use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{NewTask, NewUser, Page, Task, TaskFilter, TaskUpdate, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const TASK_COLUMNS: &str =
    "id, title, description, priority, status, owner_id, is_deleted, created_at, updated_at";

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))
    }
}

/// Maps `users_email_key` to `email`.
fn column_from_constraint(constraint: &str) -> Option<&str> {
    constraint
        .strip_suffix("_key")
        .and_then(|rest| rest.split_once('_'))
        .map(|(_, column)| column)
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                let field = db
                    .constraint()
                    .and_then(column_from_constraint)
                    .unwrap_or("field");
                StoreError::UniqueViolation {
                    field: field.to_string(),
                }
            }
            sqlx::Error::RowNotFound => StoreError::NotFound,
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.name)
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let task = Task::new(task);
        let sql = format!(
            "INSERT INTO tasks (id, title, description, priority, status, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.title)
            .bind(task.description)
            .bind(task.priority)
            .bind(task.status)
            .bind(task.owner_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn list_tasks(
        &self,
        owner_id: i32,
        filter: &TaskFilter,
        page: Page,
    ) -> StoreResult<Vec<Task>> {
        // Owner and soft-delete scoping are fixed; filters only narrow further.
        let mut sql = format!(
            "SELECT {} FROM tasks WHERE owner_id = $1 AND NOT is_deleted",
            TASK_COLUMNS
        );
        let mut param_count = 2;

        if filter.title.is_some() {
            sql.push_str(&format!(" AND title = ${}", param_count));
            param_count += 1;
        }
        if filter.priority.is_some() {
            sql.push_str(&format!(" AND priority = ${}", param_count));
            param_count += 1;
        }
        if filter.status.is_some() {
            sql.push_str(&format!(" AND status = ${}", param_count));
            param_count += 1;
        }
        sql.push_str(&format!(
            " ORDER BY created_at ASC LIMIT ${} OFFSET ${}",
            param_count,
            param_count + 1
        ));

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(owner_id);
        if let Some(title) = &filter.title {
            query = query.bind(title);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let tasks = query
            .bind(i64::from(page.limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND NOT is_deleted",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn find_owned_task(&self, id: Uuid, owner_id: i32) -> StoreResult<Option<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2 AND NOT is_deleted",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, update: &TaskUpdate) -> StoreResult<Task> {
        let sql = format!(
            "UPDATE tasks SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                priority = COALESCE($3, priority), \
                status = COALESCE($4, status), \
                updated_at = now() \
             WHERE id = $5 AND NOT is_deleted \
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(update.title.as_deref())
            .bind(update.description.as_deref())
            .bind(update.priority)
            .bind(update.status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn soft_delete_task(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE tasks SET is_deleted = TRUE, updated_at = now() WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_constraint() {
        assert_eq!(column_from_constraint("users_email_key"), Some("email"));
        assert_eq!(column_from_constraint("users_pkey"), None);
    }
}

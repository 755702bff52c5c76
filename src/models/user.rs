use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered account. The password hash never leaves the server: it is skipped
/// whenever the user is serialized into a response.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[sqlx(rename = "password_hash")]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// A user about to be persisted; `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub owner_id: String,
    pub task: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A todo about to be inserted; `completed` always starts false.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub owner_id: String,
    pub task: String,
    pub description: Option<String>,
}

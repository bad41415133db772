use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewTodo, Todo};

/// Durable todo records. Every method is a single statement, so a failure leaves no partial write.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, todo: NewTodo) -> anyhow::Result<Todo>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Todo>>;
    /// Ordered by id ascending.
    async fn find_by_owner(&self, owner_id: &str) -> anyhow::Result<Vec<Todo>>;
    /// Rewrites task, description and completed. Never touches `owner_id`.
    async fn update(&self, todo: &Todo) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: i64) -> anyhow::Result<Option<Todo>>;
}

#[derive(Clone)]
pub struct PgTodoStore {
    db: PgPool,
}

impl PgTodoStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn insert(&self, todo: NewTodo) -> anyhow::Result<Todo> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (owner_id, task, description)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, task, description, completed, created_at, updated_at
            "#,
        )
        .bind(&todo.owner_id)
        .bind(&todo.task)
        .bind(&todo.description)
        .fetch_one(&self.db)
        .await
        .context("insert todo")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, owner_id, task, description, completed, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find todo by id")?;
        Ok(row)
    }

    async fn find_by_owner(&self, owner_id: &str) -> anyhow::Result<Vec<Todo>> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, owner_id, task, description, completed, created_at, updated_at
            FROM todos
            WHERE owner_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .context("list todos by owner")?;
        Ok(rows)
    }

    async fn update(&self, todo: &Todo) -> anyhow::Result<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
               SET task = $2, description = $3, completed = $4, updated_at = now()
             WHERE id = $1
            RETURNING id, owner_id, task, description, completed, created_at, updated_at
            "#,
        )
        .bind(todo.id)
        .bind(&todo.task)
        .bind(&todo.description)
        .bind(todo.completed)
        .fetch_optional(&self.db)
        .await
        .context("update todo")?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            DELETE FROM todos
             WHERE id = $1
            RETURNING id, owner_id, task, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete todo")?;
        Ok(row)
    }
}

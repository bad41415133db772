//! In-memory stores with the same atomicity guarantees as the Postgres ones.
//! Used by `AppState::fake()` and tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    todos::{
        repo::TodoStore,
        repo_types::{NewTodo, Todo},
    },
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn insert_if_absent(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.id) {
            return Ok(None);
        }
        let created = User {
            id: user.id,
            password_hash: user.password_hash,
            name: user.name,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(created.id.clone(), created.clone());
        Ok(Some(created))
    }
}

#[derive(Default)]
struct TodoTable {
    next_id: i64,
    rows: BTreeMap<i64, Todo>,
}

#[derive(Default)]
pub struct MemoryTodoStore {
    table: Mutex<TodoTable>,
}

impl MemoryTodoStore {
    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn insert(&self, todo: NewTodo) -> anyhow::Result<Todo> {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let created = Todo {
            id: table.next_id,
            owner_id: todo.owner_id,
            task: todo.task,
            description: todo.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Todo>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &str) -> anyhow::Result<Vec<Todo>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, todo: &Todo) -> anyhow::Result<Option<Todo>> {
        let mut table = self.table.lock().await;
        let Some(row) = table.rows.get_mut(&todo.id) else {
            return Ok(None);
        };
        // owner_id is never rewritten
        row.task = todo.task.clone();
        row.description = todo.description.clone();
        row.completed = todo.completed;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<Option<Todo>> {
        Ok(self.table.lock().await.rows.remove(&id))
    }
}

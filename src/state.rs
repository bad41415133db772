use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::{AppConfig, JwtConfig};
use crate::db;
use crate::memory::{MemoryTodoStore, MemoryUserStore};
use crate::todos::repo::{PgTodoStore, TodoStore};

#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let keys = JwtKeys::new(&config.jwt);
        let users = Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>;
        let todos = Arc::new(PgTodoStore::new(pool)) as Arc<dyn TodoStore>;

        Ok(Self::from_parts(keys, users, todos))
    }

    pub fn from_parts(
        keys: JwtKeys,
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
    ) -> Self {
        Self {
            keys,
            users,
            todos,
        }
    }

    /// State backed by in-memory stores; no database required.
    pub fn fake() -> Self {
        let keys = JwtKeys::new(&JwtConfig::for_tests("test"));
        Self::from_parts(
            keys,
            Arc::new(MemoryUserStore::default()),
            Arc::new(MemoryTodoStore::default()),
        )
    }
}

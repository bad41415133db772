use tracing::{info, warn};

use super::{
    dto::{CreateTodoRequest, UpdateTodoRequest},
    repo::TodoStore,
    repo_types::{NewTodo, Todo},
};
use crate::{
    auth::{policy::authorize, repo_types::User},
    error::AppError,
};

const MAX_TASK_CHARS: usize = 500;
const MAX_DESCRIPTION_CHARS: usize = 2000;

fn clean_task(task: &str) -> Result<String, AppError> {
    let task = task.trim();
    if task.is_empty() || task.chars().count() > MAX_TASK_CHARS {
        return Err(AppError::InvalidInput(format!(
            "task must be 1-{MAX_TASK_CHARS} characters"
        )));
    }
    Ok(task.to_string())
}

fn clean_description(description: Option<String>) -> Result<Option<String>, AppError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_CHARS => Err(AppError::InvalidInput(
            format!("description must be at most {MAX_DESCRIPTION_CHARS} characters"),
        )),
        Some(d) if d.trim().is_empty() => Ok(None),
        other => Ok(other),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Todo {id} not found"))
}

/// Loads a todo and checks the actor owns it.
async fn owned_todo(store: &dyn TodoStore, actor: &User, id: i64) -> Result<Todo, AppError> {
    let todo = store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    if let Err(e) = authorize(actor, &todo.owner_id).require() {
        warn!(user_id = %actor.id, todo_id = id, "todo access denied");
        return Err(e);
    }
    Ok(todo)
}

pub async fn create_todo(
    store: &dyn TodoStore,
    actor: &User,
    payload: CreateTodoRequest,
) -> Result<Todo, AppError> {
    let task = clean_task(&payload.task)?;
    let description = clean_description(payload.description)?;

    let todo = store
        .insert(NewTodo {
            owner_id: actor.id.clone(),
            task,
            description,
        })
        .await?;
    info!(user_id = %actor.id, todo_id = todo.id, "todo created");
    Ok(todo)
}

pub async fn list_todos(store: &dyn TodoStore, actor: &User) -> Result<Vec<Todo>, AppError> {
    let todos = store.find_by_owner(&actor.id).await?;
    // Re-checked on top of the store's owner filter.
    Ok(todos
        .into_iter()
        .filter(|t| t.owner_id == actor.id)
        .collect())
}

pub async fn get_todo(store: &dyn TodoStore, actor: &User, id: i64) -> Result<Todo, AppError> {
    owned_todo(store, actor, id).await
}

pub async fn update_todo(
    store: &dyn TodoStore,
    actor: &User,
    id: i64,
    payload: UpdateTodoRequest,
) -> Result<Todo, AppError> {
    let task = clean_task(&payload.task)?;
    let description = clean_description(payload.description)?;

    let mut todo = owned_todo(store, actor, id).await?;
    todo.task = task;
    todo.description = description;
    todo.completed = payload.completed;

    let updated = store.update(&todo).await?.ok_or_else(|| not_found(id))?;
    info!(user_id = %actor.id, todo_id = id, "todo updated");
    Ok(updated)
}

pub async fn delete_todo(store: &dyn TodoStore, actor: &User, id: i64) -> Result<Todo, AppError> {
    owned_todo(store, actor, id).await?;
    let deleted = store.delete(id).await?.ok_or_else(|| not_found(id))?;
    info!(user_id = %actor.id, todo_id = id, "todo deleted");
    Ok(deleted)
}

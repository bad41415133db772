use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateTodoRequest, UpdateTodoRequest},
    repo_types::Todo,
    services,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<Todo>>> {
    let todos = services::list_todos(state.todos.as_ref(), &user).await?;
    Ok(Json(todos))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateTodoRequest>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    let todo = services::create_todo(state.todos.as_ref(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip_all, fields(user_id = %user.id, todo_id = id))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Todo>> {
    let todo = services::get_todo(state.todos.as_ref(), &user, id).await?;
    Ok(Json(todo))
}

#[instrument(skip_all, fields(user_id = %user.id, todo_id = id))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTodoRequest>,
) -> AppResult<Json<Todo>> {
    let todo = services::update_todo(state.todos.as_ref(), &user, id, payload).await?;
    Ok(Json(todo))
}

#[instrument(skip_all, fields(user_id = %user.id, todo_id = id))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Todo>> {
    let todo = services::delete_todo(state.todos.as_ref(), &user, id).await?;
    Ok(Json(todo))
}

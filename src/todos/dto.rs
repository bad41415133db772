use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub task: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full replacement of the mutable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub task: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

use axum::{extract::State, http::StatusCode, routing::{get, patch, post}, Extension, Json, Router};
use serde::Deserialize;

use crate::domain::{
    list::{List, ListId},
    todo::{CreateTodo, Todo, TodoId, UpdateTodoStatus, UpdateTodoTitle},
    user::UserId,
};
use crate::http::routing::AppState;
use crate::http::types::{ApiError, JsonBody, PathParams, QueryParams};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", patch(update_status).delete(delete_todo))
        .route("/todos/:id/title", patch(update_title))
        .route("/todos/:id/lists", get(todo_lists))
        .route("/todos/:id/lists/:list_id", post(add_list).delete(remove_list))
}

#[derive(Deserialize)]
struct TodoFilter { list_id: Option<String> }

impl TodoFilter {
    /// An absent or empty `list_id` means no filter.
    fn list(&self) -> Result<Option<ListId>, ApiError> {
        match self.list_id.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(|id| Some(ListId(id))).map_err(|_| ApiError::bad_request("invalid list_id")),
        }
    }
}

async fn list_todos(State(state): State<AppState>, Extension(owner): Extension<UserId>, QueryParams(filter): QueryParams<TodoFilter>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.todos.list(owner, filter.list()?).await?;
    Ok(Json(todos))
}

async fn create_todo(State(state): State<AppState>, Extension(owner): Extension<UserId>, JsonBody(body): JsonBody<CreateTodo>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.todos.create(owner, body).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_status(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>, JsonBody(body): JsonBody<UpdateTodoStatus>) -> Result<StatusCode, ApiError> {
    state.todos.set_completed(owner, TodoId(id), body.completed).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_title(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>, JsonBody(body): JsonBody<UpdateTodoTitle>) -> Result<StatusCode, ApiError> {
    state.todos.rename(owner, TodoId(id), &body.title).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>) -> Result<StatusCode, ApiError> {
    state.todos.delete(owner, TodoId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn todo_lists(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>) -> Result<Json<Vec<List>>, ApiError> {
    Ok(Json(state.todos.lists_of(owner, TodoId(id)).await?))
}

async fn add_list(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams((id, list_id)): PathParams<(i64, i64)>) -> Result<StatusCode, ApiError> {
    state.todos.attach(owner, TodoId(id), ListId(list_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_list(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams((id, list_id)): PathParams<(i64, i64)>) -> Result<StatusCode, ApiError> {
    state.todos.detach(owner, TodoId(id), ListId(list_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

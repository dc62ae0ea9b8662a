use axum::{extract::State, http::StatusCode, routing::{get, patch}, Extension, Json, Router};

use crate::domain::{
    list::{CreateList, List, ListId, UpdateList},
    todo::{CreateTodo, Todo},
    user::UserId,
};
use crate::http::routing::AppState;
use crate::http::types::{ApiError, JsonBody, PathParams};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lists", get(list_lists).post(create_list))
        .route("/lists/:id", patch(update_list).delete(delete_list))
        .route("/lists/:id/todos", get(list_todos).post(create_todo_in_list))
}

async fn list_lists(State(state): State<AppState>, Extension(owner): Extension<UserId>) -> Result<Json<Vec<List>>, ApiError> {
    Ok(Json(state.todos.lists(owner).await?))
}

async fn create_list(State(state): State<AppState>, Extension(owner): Extension<UserId>, JsonBody(body): JsonBody<CreateList>) -> Result<(StatusCode, Json<List>), ApiError> {
    let list = state.todos.create_list(owner, body).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

async fn update_list(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>, JsonBody(body): JsonBody<UpdateList>) -> Result<StatusCode, ApiError> {
    state.todos.update_list(owner, ListId(id), body).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_list(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>) -> Result<StatusCode, ApiError> {
    state.todos.delete_list(owner, ListId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_todos(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.todos.list(owner, Some(ListId(id))).await?))
}

async fn create_todo_in_list(State(state): State<AppState>, Extension(owner): Extension<UserId>, PathParams(id): PathParams<i64>, JsonBody(body): JsonBody<CreateTodo>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.todos.create_in_list(owner, ListId(id), body).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

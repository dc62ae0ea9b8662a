use serde::{Deserialize, Serialize};

use super::list::List;
use super::user::UserId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TodoId(pub i64);

/// A todo row as seen through the read surface.
///
/// `deleted_at` is only ever populated when the row is inspected directly;
/// every owner-scoped read filters tombstones out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(default)]
    pub lists: Vec<List>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoStatus {
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoTitle {
    pub title: String,
}

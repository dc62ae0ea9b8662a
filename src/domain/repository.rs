use async_trait::async_trait;

use super::list::{List, ListId};
use super::tag::{Tag, TagId};
use super::todo::{Todo, TodoId};
use super::user::{User, UserId};
use crate::error::Result;

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User>;
    async fn get_user_by_email(&self, email: &str) -> Result<User>;
}

/// Owner-scoped todo storage. Every method hides tombstoned rows.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn get_all_todos(&self, owner: UserId) -> Result<Vec<Todo>>;
    async fn get_todo(&self, id: TodoId, owner: UserId) -> Result<Todo>;
    async fn create_todo(&self, title: &str, owner: UserId) -> Result<Todo>;
    async fn update_todo_status(&self, id: TodoId, completed: bool, owner: UserId) -> Result<()>;
    async fn update_todo_title(&self, id: TodoId, title: &str, owner: UserId) -> Result<()>;
    async fn delete_todo(&self, id: TodoId, owner: UserId) -> Result<()>;
    async fn create_todo_in_list(&self, title: &str, list: ListId, owner: UserId) -> Result<Todo>;
}

#[async_trait]
pub trait ListRepository: Send + Sync + 'static {
    async fn list_lists(&self, owner: UserId) -> Result<Vec<List>>;
    async fn get_list(&self, id: ListId, owner: UserId) -> Result<List>;
    async fn create_list(&self, name: &str, color: &str, owner: UserId) -> Result<List>;
    async fn update_list(&self, id: ListId, name: &str, color: &str, owner: UserId) -> Result<()>;
    async fn delete_list(&self, id: ListId, owner: UserId) -> Result<()>;
    async fn add_list_to_todo(&self, todo: TodoId, list: ListId, owner: UserId) -> Result<()>;
    async fn remove_list_from_todo(&self, todo: TodoId, list: ListId, owner: UserId) -> Result<()>;
    async fn list_todos_by_list(&self, list: ListId, owner: UserId) -> Result<Vec<Todo>>;
    async fn list_todo_lists(&self, todo: TodoId, owner: UserId) -> Result<Vec<List>>;
}

/// Write access to the legacy tag tables; only migration seeding uses it.
#[async_trait]
pub trait TagRepository: Send + Sync + 'static {
    async fn create_tag(&self, name: &str, owner: UserId) -> Result<Tag>;
    async fn list_tags(&self, owner: UserId) -> Result<Vec<Tag>>;
    async fn add_tag_to_todo(&self, todo: TodoId, tag: TagId, owner: UserId) -> Result<()>;
}

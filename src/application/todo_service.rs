use crate::domain::list::{CreateList, List, ListId, UpdateList};
use crate::domain::repository::{ListRepository, TodoRepository};
use crate::domain::todo::{CreateTodo, Todo, TodoId};
use crate::domain::user::UserId;
use crate::error::Result;
use async_trait::async_trait;

/// Todo and list use-cases for one authenticated owner.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    /// All live todos, or only those in `list` when a filter is given.
    async fn list(&self, owner: UserId, list: Option<ListId>) -> Result<Vec<Todo>>;
    async fn create(&self, owner: UserId, input: CreateTodo) -> Result<Todo>;
    async fn set_completed(&self, owner: UserId, id: TodoId, completed: bool) -> Result<()>;
    async fn rename(&self, owner: UserId, id: TodoId, title: &str) -> Result<()>;
    async fn delete(&self, owner: UserId, id: TodoId) -> Result<()>;
    async fn lists_of(&self, owner: UserId, id: TodoId) -> Result<Vec<List>>;

    async fn lists(&self, owner: UserId) -> Result<Vec<List>>;
    async fn create_list(&self, owner: UserId, input: CreateList) -> Result<List>;
    async fn update_list(&self, owner: UserId, id: ListId, input: UpdateList) -> Result<()>;
    async fn delete_list(&self, owner: UserId, id: ListId) -> Result<()>;
    async fn create_in_list(&self, owner: UserId, list: ListId, input: CreateTodo) -> Result<Todo>;
    async fn attach(&self, owner: UserId, todo: TodoId, list: ListId) -> Result<()>;
    async fn detach(&self, owner: UserId, todo: TodoId, list: ListId) -> Result<()>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository + ListRepository> {
    repo: R,
}

impl<R: TodoRepository + ListRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository + ListRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self, owner: UserId, list: Option<ListId>) -> Result<Vec<Todo>> {
        match list {
            Some(list) => self.repo.list_todos_by_list(list, owner).await,
            None => self.repo.get_all_todos(owner).await,
        }
    }

    async fn create(&self, owner: UserId, input: CreateTodo) -> Result<Todo> { self.repo.create_todo(&input.title, owner).await }
    async fn set_completed(&self, owner: UserId, id: TodoId, completed: bool) -> Result<()> { self.repo.update_todo_status(id, completed, owner).await }
    async fn rename(&self, owner: UserId, id: TodoId, title: &str) -> Result<()> { self.repo.update_todo_title(id, title, owner).await }
    async fn delete(&self, owner: UserId, id: TodoId) -> Result<()> { self.repo.delete_todo(id, owner).await }
    async fn lists_of(&self, owner: UserId, id: TodoId) -> Result<Vec<List>> { self.repo.list_todo_lists(id, owner).await }

    async fn lists(&self, owner: UserId) -> Result<Vec<List>> { self.repo.list_lists(owner).await }
    async fn create_list(&self, owner: UserId, input: CreateList) -> Result<List> { self.repo.create_list(&input.name, &input.color, owner).await }

    async fn update_list(&self, owner: UserId, id: ListId, input: UpdateList) -> Result<()> {
        let existing = self.repo.get_list(id, owner).await?;
        // Only an absent or empty field keeps the stored value; whitespace still validates.
        let name = input.name.filter(|n| !n.is_empty()).unwrap_or(existing.name);
        let color = input.color.filter(|c| !c.is_empty()).unwrap_or(existing.color);
        self.repo.update_list(id, &name, &color, owner).await
    }

    async fn delete_list(&self, owner: UserId, id: ListId) -> Result<()> { self.repo.delete_list(id, owner).await }
    async fn create_in_list(&self, owner: UserId, list: ListId, input: CreateTodo) -> Result<Todo> { self.repo.create_todo_in_list(&input.title, list, owner).await }
    async fn attach(&self, owner: UserId, todo: TodoId, list: ListId) -> Result<()> { self.repo.add_list_to_todo(todo, list, owner).await }
    async fn detach(&self, owner: UserId, todo: TodoId, list: ListId) -> Result<()> { self.repo.remove_list_from_todo(todo, list, owner).await }
}

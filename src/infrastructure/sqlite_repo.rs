use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::schema;
use crate::domain::{
    list::{List, ListId},
    repository::{ListRepository, TagRepository, TodoRepository, UserRepository},
    tag::{Tag, TagId},
    todo::{Todo, TodoId},
    user::{User, UserId},
    validation,
};
use crate::error::{on_unique_violation, Error, Result};

const TODO_COLUMNS: &str = "t.id, t.title, t.completed, t.created_at, t.user_id, t.deleted_at";
const LIST_COLUMNS: &str = "l.id, l.name, l.color, l.created_at, l.user_id";

/// SQLite-backed store. Every statement that touches an owned row carries the
/// owner in its WHERE clause, and every statement that touches a todo carries
/// `deleted_at IS NULL`.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens (or creates) the store, then creates tables and runs upgrades.
    pub async fn open(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.init().await?;
        Ok(repo)
    }

    /// Opens a single long-lived connection in WAL mode. All writes are
    /// serialized through it.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> Result<()> {
        schema::init(&self.pool).await?;
        Ok(())
    }

    pub async fn migrate_tags_to_lists(&self) -> Result<()> {
        schema::migrate_tags_to_lists(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool { &self.pool }

    async fn ensure_live_todo(&self, id: TodoId, owner: UserId) -> Result<()> {
        let row = sqlx::query("SELECT 1 FROM todos WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL")
            .bind(id.0)
            .bind(owner.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|_| ()).ok_or(Error::NotFound)
    }

    async fn ensure_list(&self, id: ListId, owner: UserId) -> Result<()> {
        let row = sqlx::query("SELECT 1 FROM lists WHERE id = ?1 AND user_id = ?2")
            .bind(id.0)
            .bind(owner.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|_| ()).ok_or(Error::ListNotFound)
    }

    /// Fills `lists` on each todo with one query over the owner's live edges.
    async fn attach_lists(&self, todos: &mut [Todo], owner: UserId) -> Result<()> {
        if todos.is_empty() {
            return Ok(());
        }
        let rows = sqlx::query(&format!(
            "SELECT tl.todo_id AS todo_id, {LIST_COLUMNS}
             FROM todo_lists tl
             JOIN lists l ON l.id = tl.list_id
             JOIN todos t ON t.id = tl.todo_id
             WHERE t.user_id = ?1 AND l.user_id = ?1 AND t.deleted_at IS NULL
             ORDER BY l.created_at DESC, l.id DESC"
        ))
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;

        let mut by_todo: HashMap<i64, Vec<List>> = HashMap::new();
        for row in &rows {
            let todo_id: i64 = row.try_get("todo_id")?;
            by_todo.entry(todo_id).or_default().push(row_to_list(row)?);
        }
        for todo in todos.iter_mut() {
            todo.lists = by_todo.remove(&todo.id.0).unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)")
            .bind(email)
            .bind(password_hash)
            .bind(now())
            .execute(&self.pool)
            .await
            .map_err(|e| on_unique_violation(e, Error::DuplicateEmail))?;

        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE id = ?1")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        row_to_user(&row)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => row_to_user(&row),
            None => Err(Error::UserNotFound),
        }
    }
}

#[async_trait]
impl TodoRepository for SqliteRepository {
    async fn get_all_todos(&self, owner: UserId) -> Result<Vec<Todo>> {
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos t
             WHERE t.user_id = ?1 AND t.deleted_at IS NULL
             ORDER BY t.created_at DESC, t.id DESC"
        ))
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;
        let mut todos = rows.iter().map(row_to_todo).collect::<Result<Vec<_>>>()?;
        self.attach_lists(&mut todos, owner).await?;
        Ok(todos)
    }

    async fn get_todo(&self, id: TodoId, owner: UserId) -> Result<Todo> {
        let row = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos t
             WHERE t.id = ?1 AND t.user_id = ?2 AND t.deleted_at IS NULL"
        ))
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await?;
        let mut todo = row.as_ref().map(row_to_todo).transpose()?.ok_or(Error::NotFound)?;
        todo.lists = self.list_todo_lists(id, owner).await?;
        Ok(todo)
    }

    async fn create_todo(&self, title: &str, owner: UserId) -> Result<Todo> {
        let title = validation::todo_title(title)?;
        let result = sqlx::query("INSERT INTO todos (title, completed, created_at, user_id) VALUES (?1, 0, ?2, ?3)")
            .bind(&title)
            .bind(now())
            .bind(owner.0)
            .execute(&self.pool)
            .await?;
        self.get_todo(TodoId(result.last_insert_rowid()), owner).await
    }

    async fn update_todo_status(&self, id: TodoId, completed: bool, owner: UserId) -> Result<()> {
        let result = sqlx::query("UPDATE todos SET completed = ?1 WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL")
            .bind(completed)
            .bind(id.0)
            .bind(owner.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(Error::NotFound) }
        Ok(())
    }

    async fn update_todo_title(&self, id: TodoId, title: &str, owner: UserId) -> Result<()> {
        let title = validation::todo_title(title)?;
        let result = sqlx::query("UPDATE todos SET title = ?1 WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL")
            .bind(&title)
            .bind(id.0)
            .bind(owner.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(Error::NotFound) }
        Ok(())
    }

    async fn delete_todo(&self, id: TodoId, owner: UserId) -> Result<()> {
        let result = sqlx::query("UPDATE todos SET deleted_at = ?1 WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL")
            .bind(now())
            .bind(id.0)
            .bind(owner.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(Error::NotFound) }
        Ok(())
    }

    async fn create_todo_in_list(&self, title: &str, list: ListId, owner: UserId) -> Result<Todo> {
        let title = validation::todo_title(title)?;

        // Dropping `tx` on any early return rolls the whole unit back.
        let mut tx = self.pool.begin().await?;
        let owned = sqlx::query("SELECT 1 FROM lists WHERE id = ?1 AND user_id = ?2")
            .bind(list.0)
            .bind(owner.0)
            .fetch_optional(&mut *tx)
            .await?;
        if owned.is_none() {
            return Err(Error::ListNotFound);
        }
        let inserted = sqlx::query("INSERT INTO todos (title, completed, created_at, user_id) VALUES (?1, 0, ?2, ?3)")
            .bind(&title)
            .bind(now())
            .bind(owner.0)
            .execute(&mut *tx)
            .await?;
        let id = TodoId(inserted.last_insert_rowid());
        sqlx::query("INSERT INTO todo_lists (todo_id, list_id) VALUES (?1, ?2)")
            .bind(id.0)
            .bind(list.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get_todo(id, owner).await
    }
}

#[async_trait]
impl ListRepository for SqliteRepository {
    async fn list_lists(&self, owner: UserId) -> Result<Vec<List>> {
        let rows = sqlx::query(&format!(
            "SELECT {LIST_COLUMNS} FROM lists l WHERE l.user_id = ?1 ORDER BY l.created_at DESC, l.id DESC"
        ))
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_list).collect()
    }

    async fn get_list(&self, id: ListId, owner: UserId) -> Result<List> {
        let row = sqlx::query(&format!("SELECT {LIST_COLUMNS} FROM lists l WHERE l.id = ?1 AND l.user_id = ?2"))
            .bind(id.0)
            .bind(owner.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_list).transpose()?.ok_or(Error::ListNotFound)
    }

    async fn create_list(&self, name: &str, color: &str, owner: UserId) -> Result<List> {
        let name = validation::list_name(name)?;
        let color = validation::list_color_strict(color)?;
        let result = sqlx::query("INSERT INTO lists (name, color, created_at, user_id) VALUES (?1, ?2, ?3, ?4)")
            .bind(&name)
            .bind(&color)
            .bind(now())
            .bind(owner.0)
            .execute(&self.pool)
            .await
            .map_err(|e| on_unique_violation(e, Error::DuplicateList))?;
        self.get_list(ListId(result.last_insert_rowid()), owner).await
    }

    async fn update_list(&self, id: ListId, name: &str, color: &str, owner: UserId) -> Result<()> {
        let name = validation::list_name(name)?;
        let color = validation::list_color_coerced(color);
        let result = sqlx::query("UPDATE lists SET name = ?1, color = ?2 WHERE id = ?3 AND user_id = ?4")
            .bind(&name)
            .bind(&color)
            .bind(id.0)
            .bind(owner.0)
            .execute(&self.pool)
            .await
            .map_err(|e| on_unique_violation(e, Error::DuplicateList))?;
        if result.rows_affected() == 0 { return Err(Error::ListNotFound) }
        Ok(())
    }

    async fn delete_list(&self, id: ListId, owner: UserId) -> Result<()> {
        let result = sqlx::query("DELETE FROM lists WHERE id = ?1 AND user_id = ?2")
            .bind(id.0)
            .bind(owner.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(Error::ListNotFound) }
        Ok(())
    }

    async fn add_list_to_todo(&self, todo: TodoId, list: ListId, owner: UserId) -> Result<()> {
        self.ensure_live_todo(todo, owner).await?;
        self.ensure_list(list, owner).await?;
        // The insert repeats both ownership predicates so it cannot link rows
        // that changed hands between the checks and the write.
        sqlx::query(
            "INSERT OR IGNORE INTO todo_lists (todo_id, list_id)
             SELECT t.id, l.id FROM todos t, lists l
             WHERE t.id = ?1 AND t.user_id = ?3 AND t.deleted_at IS NULL
               AND l.id = ?2 AND l.user_id = ?3",
        )
        .bind(todo.0)
        .bind(list.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_list_from_todo(&self, todo: TodoId, list: ListId, owner: UserId) -> Result<()> {
        self.ensure_live_todo(todo, owner).await?;
        self.ensure_list(list, owner).await?;
        let result = sqlx::query(
            "DELETE FROM todo_lists
             WHERE todo_id = ?1 AND list_id = ?2
               AND todo_id IN (SELECT id FROM todos WHERE user_id = ?3 AND deleted_at IS NULL)
               AND list_id IN (SELECT id FROM lists WHERE user_id = ?3)",
        )
        .bind(todo.0)
        .bind(list.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 { return Err(Error::NotFound) }
        Ok(())
    }

    async fn list_todos_by_list(&self, list: ListId, owner: UserId) -> Result<Vec<Todo>> {
        self.ensure_list(list, owner).await?;
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos t
             JOIN todo_lists tl ON tl.todo_id = t.id
             WHERE tl.list_id = ?1 AND t.user_id = ?2 AND t.deleted_at IS NULL
             ORDER BY t.created_at DESC, t.id DESC"
        ))
        .bind(list.0)
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;
        let mut todos = rows.iter().map(row_to_todo).collect::<Result<Vec<_>>>()?;
        self.attach_lists(&mut todos, owner).await?;
        Ok(todos)
    }

    async fn list_todo_lists(&self, todo: TodoId, owner: UserId) -> Result<Vec<List>> {
        self.ensure_live_todo(todo, owner).await?;
        let rows = sqlx::query(&format!(
            "SELECT {LIST_COLUMNS} FROM lists l
             JOIN todo_lists tl ON tl.list_id = l.id
             WHERE tl.todo_id = ?1 AND l.user_id = ?2
             ORDER BY l.created_at DESC, l.id DESC"
        ))
        .bind(todo.0)
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_list).collect()
    }
}

#[async_trait]
impl TagRepository for SqliteRepository {
    async fn create_tag(&self, name: &str, owner: UserId) -> Result<Tag> {
        let name = validation::tag_name(name)?;
        let result = sqlx::query("INSERT INTO tags (name, created_at, user_id) VALUES (?1, ?2, ?3)")
            .bind(&name)
            .bind(now())
            .bind(owner.0)
            .execute(&self.pool)
            .await
            .map_err(|e| on_unique_violation(e, Error::DuplicateTag))?;
        let row = sqlx::query("SELECT id, name, created_at, user_id FROM tags WHERE id = ?1 AND user_id = ?2")
            .bind(result.last_insert_rowid())
            .bind(owner.0)
            .fetch_one(&self.pool)
            .await?;
        row_to_tag(&row)
    }

    async fn list_tags(&self, owner: UserId) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, created_at, user_id FROM tags WHERE user_id = ?1 ORDER BY created_at DESC, id DESC")
            .bind(owner.0)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_tag).collect()
    }

    async fn add_tag_to_todo(&self, todo: TodoId, tag: TagId, owner: UserId) -> Result<()> {
        self.ensure_live_todo(todo, owner).await?;
        let owned = sqlx::query("SELECT 1 FROM tags WHERE id = ?1 AND user_id = ?2")
            .bind(tag.0)
            .bind(owner.0)
            .fetch_optional(&self.pool)
            .await?;
        if owned.is_none() {
            return Err(Error::TagNotFound);
        }
        sqlx::query("INSERT OR IGNORE INTO todo_tags (todo_id, tag_id) VALUES (?1, ?2)")
            .bind(todo.0)
            .bind(tag.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn now() -> String { Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) }

fn row_to_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: UserId(row.try_get("id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo> {
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        title: row.try_get("title")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
        user_id: UserId(row.try_get("user_id")?),
        deleted_at: row.try_get("deleted_at")?,
        lists: Vec::new(),
    })
}

fn row_to_list(row: &SqliteRow) -> Result<List> {
    Ok(List {
        id: ListId(row.try_get("id")?),
        name: row.try_get("name")?,
        color: row.try_get("color")?,
        created_at: row.try_get("created_at")?,
        user_id: UserId(row.try_get("user_id")?),
    })
}

fn row_to_tag(row: &SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: TagId(row.try_get("id")?),
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        user_id: UserId(row.try_get("user_id")?),
    })
}

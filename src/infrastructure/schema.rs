//! Table creation and the idempotent upgrades run on every open.

use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::domain::list::DEFAULT_COLOR;

const CREATE_TABLES: [&str; 6] = [
    "CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        email         TEXT    NOT NULL UNIQUE,
        password_hash TEXT    NOT NULL,
        created_at    TEXT    NOT NULL DEFAULT (datetime('now'))
    )",
    "CREATE TABLE IF NOT EXISTS todos (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        title      TEXT    NOT NULL,
        completed  BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT    NOT NULL DEFAULT (datetime('now')),
        user_id    INTEGER NOT NULL REFERENCES users(id)
    )",
    "CREATE TABLE IF NOT EXISTS tags (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT    NOT NULL,
        created_at TEXT    NOT NULL DEFAULT (datetime('now')),
        user_id    INTEGER NOT NULL REFERENCES users(id),
        UNIQUE (user_id, name)
    )",
    "CREATE TABLE IF NOT EXISTS todo_tags (
        todo_id INTEGER NOT NULL REFERENCES todos(id),
        tag_id  INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (todo_id, tag_id)
    )",
    "CREATE TABLE IF NOT EXISTS lists (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT    NOT NULL,
        color      TEXT    NOT NULL DEFAULT '#BBDEFB',
        created_at TEXT    NOT NULL DEFAULT (datetime('now')),
        user_id    INTEGER NOT NULL REFERENCES users(id),
        UNIQUE (user_id, name)
    )",
    "CREATE TABLE IF NOT EXISTS todo_lists (
        todo_id INTEGER NOT NULL REFERENCES todos(id),
        list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
        PRIMARY KEY (todo_id, list_id)
    )",
];

pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in CREATE_TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    add_deleted_at_column(pool).await?;
    migrate_tags_to_lists(pool).await?;
    Ok(())
}

async fn add_deleted_at_column(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    match sqlx::query("ALTER TABLE todos ADD COLUMN deleted_at TEXT").execute(pool).await {
        Ok(_) => {
            info!("added todos.deleted_at");
            Ok(())
        }
        Err(sqlx::Error::Database(db)) if db.message().contains("duplicate column name") => Ok(()),
        Err(e) => Err(e),
    }
}

#[derive(Debug)]
struct LegacyTag {
    user_id: i64,
    name: String,
    created_at: String,
}

#[derive(Debug)]
struct LegacyEdge {
    todo_id: i64,
    user_id: i64,
    name: String,
}

/// Promotes every legacy tag to a list of the same name and every tag edge to
/// a list edge. Rows are read fully before writing: the pool holds a single
/// connection, so a live cursor would block the inserts. Inserts ignore
/// conflicts, which makes a second run a no-op. Edges whose todo was
/// hard-deleted by an older release are skipped. Legacy rows are left in place.
pub async fn migrate_tags_to_lists(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let tags = sqlx::query("SELECT user_id, name, created_at FROM tags ORDER BY id")
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| -> Result<LegacyTag, sqlx::Error> {
            Ok(LegacyTag {
                user_id: row.try_get("user_id")?,
                name: row.try_get("name")?,
                created_at: row.try_get("created_at")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    let edges = sqlx::query(
        "SELECT tt.todo_id, t.user_id, t.name
         FROM todo_tags tt
         JOIN tags t ON t.id = tt.tag_id
         JOIN todos td ON td.id = tt.todo_id
         ORDER BY tt.todo_id, t.id",
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| -> Result<LegacyEdge, sqlx::Error> {
        Ok(LegacyEdge {
            todo_id: row.try_get("todo_id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
        })
    })
    .collect::<Result<Vec<_>, sqlx::Error>>()?;

    let mut lists_created = 0u64;
    for tag in &tags {
        lists_created += sqlx::query(
            "INSERT OR IGNORE INTO lists (name, color, created_at, user_id) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&tag.name)
        .bind(DEFAULT_COLOR)
        .bind(&tag.created_at)
        .bind(tag.user_id)
        .execute(pool)
        .await?
        .rows_affected();
    }

    let mut edges_created = 0u64;
    for edge in &edges {
        edges_created += sqlx::query(
            "INSERT OR IGNORE INTO todo_lists (todo_id, list_id)
             SELECT ?1, id FROM lists WHERE user_id = ?2 AND name = ?3",
        )
        .bind(edge.todo_id)
        .bind(edge.user_id)
        .bind(&edge.name)
        .execute(pool)
        .await?
        .rows_affected();
    }

    if lists_created > 0 || edges_created > 0 {
        info!(lists_created, edges_created, "migrated legacy tags to lists");
    } else {
        debug!(tags = tags.len(), edges = edges.len(), "tag migration: nothing to do");
    }
    Ok(())
}

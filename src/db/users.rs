use crate::db::models::{User, UserId};
use crate::db::sqlite::SqlitePool;
use crate::error::LedgerError;
use tracing::info;

/// Name → id lookup, populated lazily the first time a name is used.
#[derive(Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
}

impl UserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Return the id for `name`, inserting the user first if it is unseen.
    /// Uses SQLite `INSERT ... ON CONFLICT(name) DO NOTHING`.
    pub async fn ensure_user(&self, name: &str) -> Result<UserId, LedgerError> {
        let inserted = sqlx::query("INSERT INTO users (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let rec: (i64,) = sqlx::query_as("SELECT id FROM users WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        if inserted > 0 {
            info!(user = name, id = rec.0, "user created");
        }
        Ok(rec.0)
    }

    pub async fn find_user(&self, name: &str) -> Result<Option<User>, LedgerError> {
        let row: Option<(i64, String)> = sqlx::query_as("SELECT id, name FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, name)| User { id, name }))
    }

    pub async fn count_users(&self) -> Result<i64, LedgerError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// All user names, sorted for a selection list.
    pub async fn list_users(&self) -> Result<Vec<String>, LedgerError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM users ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}

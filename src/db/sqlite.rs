use crate::db::entries::EntryStore;
use crate::db::meta::MetaStore;
use crate::db::schema::SQLITE_INIT;
use crate::db::users::UserDirectory;
use crate::error::LedgerError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// The three tables of the ledger, sharing one single-connection pool.
#[derive(Clone)]
pub struct LedgerStorage {
    pool: SqlitePool,
    pub users: UserDirectory,
    pub entries: EntryStore,
    pub meta: MetaStore,
}

impl LedgerStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserDirectory::new(pool.clone()),
            entries: EntryStore::new(pool.clone()),
            meta: MetaStore::new(pool.clone()),
            pool,
        }
    }

    /// Open (creating if missing) the database at `database_url` and
    /// initialize the schema.
    pub async fn open(database_url: &str) -> Result<Self, LedgerError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        debug!(database_url, "ledger storage opened");
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), LedgerError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

//! Database module: models, schema and stores for the ledger.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `users.rs`, `entries.rs`, `meta.rs`: one store per table
//! - `sqlite.rs`: pool setup and the `LedgerStorage` bundle

pub mod entries;
pub mod meta;
pub mod models;
pub mod schema;
pub mod sqlite;
pub mod users;

pub use entries::{EntryStore, KindTotals};
pub use meta::MetaStore;
pub use models::{Entry, EntryId, EntryKind, NewEntry, User, UserId};
pub use schema::{LAST_NOTIFIED_MONTH, SQLITE_INIT};
pub use sqlite::{LedgerStorage, SqlitePool};
pub use users::UserDirectory;

//! SQL DDL for initializing the ledger database (SQLite).

/// SQLite schema with:
/// - `users`: `name` UNIQUE, rows created lazily on first use of a name
/// - `entries`: `date` as `YYYY-MM-DD` text, `created_at` as RFC3339 text
/// - `meta`: key/value state that must survive restarts
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    kind TEXT NOT NULL, -- 'income' | 'expense'
    amount REAL NOT NULL,
    category TEXT NULL,
    note TEXT NULL,
    date TEXT NOT NULL, -- YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY(user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_entries_user_date ON entries(user_id, date);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Meta key holding the last `YYYY-MM` a monthly summary was delivered for.
pub const LAST_NOTIFIED_MONTH: &str = "last_notified_month";

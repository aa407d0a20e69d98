use crate::db::models::{DATE_FORMAT, Entry, EntryId, EntryKind, NewEntry, format_date};
use crate::db::sqlite::SqlitePool;
use crate::db::users::UserDirectory;
use crate::error::LedgerError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-kind totals. A kind with no matching entries is absent, not zero.
pub type KindTotals = BTreeMap<EntryKind, f64>;

#[derive(Clone)]
pub struct EntryStore {
    pool: SqlitePool,
}

impl EntryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve (or create) the owning user through `users`, then insert the
    /// entry with `created_at` set to now. Returns the new row id.
    pub async fn add_entry(
        &self,
        users: &UserDirectory,
        entry: &NewEntry,
    ) -> Result<EntryId, LedgerError> {
        let user_id = users.ensure_user(&entry.user_name).await?;
        let created_at = Utc::now().to_rfc3339();

        let res = sqlx::query(
            r#"
            INSERT INTO entries (user_id, kind, amount, category, note, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(entry.kind.as_str())
        .bind(entry.amount)
        .bind(entry.category.as_deref())
        .bind(entry.note.as_deref())
        .bind(format_date(entry.date))
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        let id = res.last_insert_rowid();
        debug!(
            id,
            user = %entry.user_name,
            kind = %entry.kind,
            amount = entry.amount,
            "entry stored"
        );
        Ok(id)
    }

    /// Entries for `user_name`, newest date first; same-day entries keep
    /// insertion order. Unknown users yield an empty list.
    pub async fn list_entries_for_user(&self, user_name: &str) -> Result<Vec<Entry>, LedgerError> {
        let rows = sqlx::query(
            r#"SELECT e.id, e.user_id, u.name AS user_name, e.kind, e.amount,
               e.category, e.note, e.date, e.created_at
               FROM entries e JOIN users u ON e.user_id = u.id
               WHERE u.name = ?
               ORDER BY e.date DESC, e.id ASC"#,
        )
        .bind(user_name)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    /// Sum amounts by kind for `user_name` over the closed range
    /// `[start, end]`. An inverted range matches nothing.
    pub async fn sum_between(
        &self,
        user_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<KindTotals, LedgerError> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            r#"SELECT e.kind, CAST(SUM(e.amount) AS REAL) AS total
               FROM entries e JOIN users u ON e.user_id = u.id
               WHERE u.name = ? AND e.date BETWEEN ? AND ?
               GROUP BY e.kind"#,
        )
        .bind(user_name)
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_all(&self.pool)
        .await?;

        let mut totals = KindTotals::new();
        for (kind, total) in rows {
            match kind.parse::<EntryKind>() {
                Ok(kind) => {
                    totals.insert(kind, total);
                }
                Err(_) => warn!(user = user_name, kind = %kind, "skipping entries with unknown kind"),
            }
        }
        Ok(totals)
    }

    fn row_to_model(row: SqliteRow) -> Result<Entry, LedgerError> {
        let id: i64 = row.try_get("id")?;
        let user_id: i64 = row.try_get("user_id")?;
        let user_name: String = row.try_get("user_name")?;
        let kind_str: String = row.try_get("kind")?;
        let amount: f64 = row.try_get("amount")?;
        let category: Option<String> = row.try_get("category")?;
        let note: Option<String> = row.try_get("note")?;
        let date_str: String = row.try_get("date")?;
        let created_str: String = row.try_get("created_at")?;

        let kind: EntryKind = kind_str
            .parse()
            .map_err(|_| sqlx::Error::Decode(format!("unknown entry kind {kind_str:?}").into()))?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let created_at = parse_created_at(&created_str)?;

        Ok(Entry {
            id,
            user_id,
            user_name,
            kind,
            amount,
            category,
            note,
            date,
            created_at,
        })
    }
}

/// `created_at` is RFC3339 when written by [`EntryStore::add_entry`], or
/// SQLite's `CURRENT_TIMESTAMP` format (UTC) for rows written elsewhere.
fn parse_created_at(s: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_accepts_both_timestamp_formats() {
        let rfc = parse_created_at("2024-03-05T10:00:00+00:00").unwrap();
        let sqlite = parse_created_at("2024-03-05 10:00:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert!(parse_created_at("yesterday").is_err());
    }
}

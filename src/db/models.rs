use crate::error::LedgerError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;
pub type EntryId = i64;

/// Storage format for `entries.date`. Range queries compare this text
/// lexicographically, so every date must go through [`format_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            _ => Err(LedgerError::UnknownKind(s.to_string())),
        }
    }
}

/// A validated insertion request. The user is referenced by name and
/// resolved (or created) by the user directory at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub user_name: String,
    pub kind: EntryKind,
    pub amount: f64,
    pub category: Option<String>,
    pub note: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub user_id: UserId,
    pub user_name: String,
    pub kind: EntryKind,
    pub amount: f64,
    pub category: Option<String>,
    pub note: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// One history line: `2024-03-05 Income 1000.00 (Salary) March pay`.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} ({})",
            format_date(self.date),
            self.kind.label(),
            self.amount,
            self.category.as_deref().unwrap_or("-"),
        )?;
        if let Some(note) = self.note.as_deref() {
            write!(f, " {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Income".parse::<EntryKind>().unwrap(), EntryKind::Income);
        assert_eq!(" expense ".parse::<EntryKind>().unwrap(), EntryKind::Expense);
        assert!(matches!(
            "refund".parse::<EntryKind>(),
            Err(LedgerError::UnknownKind(_))
        ));
    }

    #[test]
    fn dates_are_zero_padded_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(d), "2024-03-05");
    }

    #[test]
    fn history_line_includes_optional_note() {
        let entry = Entry {
            id: 1,
            user_id: 1,
            user_name: "Alice".to_string(),
            kind: EntryKind::Income,
            amount: 1000.0,
            category: Some("Salary".to_string()),
            note: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(entry.to_string(), "2024-03-05 Income 1000.00 (Salary)");

        let with_note = Entry {
            note: Some("March pay".to_string()),
            category: None,
            ..entry
        };
        assert_eq!(with_note.to_string(), "2024-03-05 Income 1000.00 (-) March pay");
    }
}

//! Boundary validation. Nothing reaches the stores without passing through
//! here, which is what keeps `amount >= 0` and the ISO date format true.

use crate::db::models::{DATE_FORMAT, EntryKind, NewEntry};
use crate::error::LedgerError;
use chrono::NaiveDate;

/// Raw "add entry" input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryForm {
    pub amount: String,
    pub category: Option<String>,
    pub note: Option<String>,
    /// `None` means today.
    pub date: Option<String>,
}

impl EntryForm {
    pub fn into_new_entry(
        self,
        user_name: &str,
        kind: EntryKind,
        today: NaiveDate,
    ) -> Result<NewEntry, LedgerError> {
        let date = match self.date.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => parse_date(text)?,
            _ => today,
        };
        Ok(NewEntry {
            user_name: validate_user_name(user_name)?,
            kind,
            amount: parse_amount(&self.amount)?,
            category: non_blank(self.category),
            note: non_blank(self.note),
            date,
        })
    }
}

/// A positive, finite decimal number.
pub fn parse_amount(text: &str) -> Result<f64, LedgerError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LedgerError::BlankField("amount"));
    }
    let amount: f64 = text
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(text.to_string()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::InvalidAmount(text.to_string()));
    }
    Ok(amount)
}

pub fn parse_date(text: &str) -> Result<NaiveDate, LedgerError> {
    let text = text.trim();
    // chrono accepts unpadded fields; storage needs the fixed 10-char form
    if text.len() != 10 {
        return Err(LedgerError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(text.to_string()))
}

pub fn validate_user_name(name: &str) -> Result<String, LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::BlankField("user name"));
    }
    Ok(name.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()
    }

    #[test]
    fn amount_must_be_a_positive_number() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), 12.5);
        assert!(matches!(parse_amount(""), Err(LedgerError::BlankField("amount"))));
        assert!(matches!(parse_amount("abc"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-5"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("0"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("inf"), Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn dates_must_be_zero_padded_iso() {
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert!(matches!(parse_date("2024-3-5"), Err(LedgerError::InvalidDate(_))));
        assert!(matches!(parse_date("05/03/2024"), Err(LedgerError::InvalidDate(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(LedgerError::InvalidDate(_))));
    }

    #[test]
    fn form_defaults_date_and_drops_blank_text() {
        let form = EntryForm {
            amount: "200".to_string(),
            category: Some("  ".to_string()),
            note: Some(" groceries ".to_string()),
            date: None,
        };
        let entry = form
            .into_new_entry(" Alice ", EntryKind::Expense, today())
            .unwrap();
        assert_eq!(entry.user_name, "Alice");
        assert_eq!(entry.date, today());
        assert_eq!(entry.category, None);
        assert_eq!(entry.note.as_deref(), Some("groceries"));
    }

    #[test]
    fn blank_user_is_rejected() {
        let form = EntryForm {
            amount: "1".to_string(),
            ..Default::default()
        };
        let err = form
            .into_new_entry("   ", EntryKind::Income, today())
            .unwrap_err();
        assert!(err.is_input_error());
    }
}

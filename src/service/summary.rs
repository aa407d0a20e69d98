use crate::db::{EntryKind, KindTotals};
use crate::error::LedgerError;
use crate::service::ledger_actor::LedgerHandle;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// The two date windows the dashboard and the monthly report use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    Today,
    MonthToDate,
}

impl SummaryPeriod {
    /// Inclusive `(start, end)` bounds relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            SummaryPeriod::Today => (today, today),
            SummaryPeriod::MonthToDate => (today.with_day(1).unwrap_or(today), today),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
}

impl Summary {
    pub fn from_totals(totals: &KindTotals) -> Self {
        Self {
            income: totals.get(&EntryKind::Income).copied().unwrap_or(0.0),
            expense: totals.get(&EntryKind::Expense).copied().unwrap_or(0.0),
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    /// Aggregate `user_name`'s entries over `period`.
    pub async fn for_period(
        ledger: &LedgerHandle,
        user_name: &str,
        period: SummaryPeriod,
        today: NaiveDate,
    ) -> Result<Self, LedgerError> {
        let (start, end) = period.bounds(today);
        let totals = ledger.sum_between(user_name, start, end).await?;
        Ok(Self::from_totals(&totals))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Income {:.2}, Expense {:.2}, Net {:.2}",
            self.income,
            self.expense,
            self.net()
        )
    }
}

/// Today and month-to-date figures for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub user: String,
    pub today: Summary,
    pub month: Summary,
}

impl Dashboard {
    pub async fn load(
        ledger: &LedgerHandle,
        user_name: &str,
        today: NaiveDate,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            user: user_name.to_string(),
            today: Summary::for_period(ledger, user_name, SummaryPeriod::Today, today).await?,
            month: Summary::for_period(ledger, user_name, SummaryPeriod::MonthToDate, today)
                .await?,
        })
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User: {}", self.user)?;
        writeln!(f, "Today:      {}", self.today)?;
        write!(f, "This month: {}", self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_to_date_starts_on_the_first() {
        let (start, end) = SummaryPeriod::MonthToDate.bounds(date(2024, 3, 17));
        assert_eq!(start, date(2024, 3, 1));
        assert_eq!(end, date(2024, 3, 17));

        let (start, end) = SummaryPeriod::Today.bounds(date(2024, 3, 17));
        assert_eq!(start, end);
    }

    #[test]
    fn missing_kinds_count_as_zero() {
        let mut totals = KindTotals::new();
        totals.insert(EntryKind::Income, 1000.0);
        let summary = Summary::from_totals(&totals);
        assert_eq!(summary.expense, 0.0);
        assert_eq!(summary.net(), 1000.0);
        assert_eq!(Summary::from_totals(&KindTotals::new()), Summary::default());
    }

    #[test]
    fn summary_line_has_two_decimals() {
        let summary = Summary {
            income: 1000.0,
            expense: 200.5,
        };
        assert_eq!(
            summary.to_string(),
            "Income 1000.00, Expense 200.50, Net 799.50"
        );
    }
}

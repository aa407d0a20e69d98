use crate::db::LAST_NOTIFIED_MONTH;
use crate::error::LedgerError;
use crate::service::ledger_actor::LedgerHandle;
use crate::service::notifier::{Notification, Notifier};
use crate::service::preferences::Preferences;
use crate::service::summary::{Summary, SummaryPeriod};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum MonthlyOutcome {
    /// The marker already holds this month; nothing was computed or sent.
    AlreadyNotified { month: String },
    /// Delivered and the marker now holds `month`.
    Sent {
        month: String,
        user: String,
        summary: Summary,
    },
    /// Delivery failed; the marker is unchanged so the next trigger retries.
    DeliveryFailed { month: String, reason: String },
}

/// Who the monthly summary is for: the selected user from the preferences
/// file, or a fixed default identity.
#[derive(Debug, Clone)]
pub struct UserSelection {
    preferences_path: PathBuf,
    default_user: String,
}

impl UserSelection {
    pub fn new(preferences_path: impl Into<PathBuf>, default_user: impl Into<String>) -> Self {
        Self {
            preferences_path: preferences_path.into(),
            default_user: default_user.into(),
        }
    }

    /// Re-read on every call so a selection made since the last run counts.
    pub fn resolve(&self) -> Result<String, LedgerError> {
        let prefs = Preferences::load(&self.preferences_path)?;
        Ok(prefs.user_or(&self.default_user).to_string())
    }
}

/// The hook an OS-level trigger calls, roughly once a month. Safe to call
/// any number of times: the stored marker allows one delivery per month.
pub struct MonthlyReporter<N> {
    ledger: LedgerHandle,
    notifier: N,
    selection: UserSelection,
    in_flight: Mutex<()>,
}

impl<N: Notifier> MonthlyReporter<N> {
    pub fn new(ledger: LedgerHandle, notifier: N, selection: UserSelection) -> Self {
        Self {
            ledger,
            notifier,
            selection,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn check_and_notify_today(&self) -> Result<MonthlyOutcome, LedgerError> {
        self.check_and_notify(Local::now().date_naive()).await
    }

    pub async fn check_and_notify(&self, today: NaiveDate) -> Result<MonthlyOutcome, LedgerError> {
        let _guard = self.in_flight.lock().await;
        let month = today.format("%Y-%m").to_string();

        let last = self.ledger.meta_get(LAST_NOTIFIED_MONTH, "").await?;
        if last == month {
            debug!(%month, "monthly summary already sent");
            return Ok(MonthlyOutcome::AlreadyNotified { month });
        }

        let user = self.selection.resolve()?;
        let summary =
            Summary::for_period(&self.ledger, &user, SummaryPeriod::MonthToDate, today).await?;
        let notification = Notification {
            title: format!("Monthly summary for {user}"),
            message: summary.to_string(),
        };

        if let Err(e) = self.notifier.notify(&notification).await {
            warn!(%month, user = %user, error = %e, "monthly notification not delivered");
            return Ok(MonthlyOutcome::DeliveryFailed {
                month,
                reason: e.to_string(),
            });
        }

        self.ledger.meta_set(LAST_NOTIFIED_MONTH, &month).await?;
        info!(%month, user = %user, previous = %last, "monthly summary sent");
        Ok(MonthlyOutcome::Sent {
            month,
            user,
            summary,
        })
    }
}

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::time::Duration;

/// First day of the month after `now`, at `hour:00` local time.
pub fn next_monthly_wake(now: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(now.date());
    let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    first.and_time(time)
}

/// Pause before re-running a monthly check that did not deliver.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Sleep after a failed check: one retry interval, never past the next wake.
pub fn retry_delay(until_next_wake: Duration) -> Duration {
    until_next_wake.min(RETRY_INTERVAL)
}

/// How long to sleep from now until the next monthly wake-up.
pub fn sleep_until_next_wake(hour: u32) -> Duration {
    let now = Local::now();
    let wake = next_monthly_wake(now.naive_local(), hour);
    // DST gaps have no local 09:00; fall back to a day's sleep and re-check
    match Local.from_local_datetime(&wake).earliest() {
        Some(target) => (target - now).to_std().unwrap_or(Duration::ZERO),
        None => Duration::from_secs(24 * 60 * 60),
    }
}

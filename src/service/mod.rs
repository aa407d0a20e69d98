pub mod ledger_actor;
pub mod monthly_report;
pub mod notifier;
pub mod preferences;
pub mod schedule;
pub mod summary;

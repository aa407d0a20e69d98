pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod types;

pub use config::Config;
pub use error::LedgerError;
pub use service::ledger_actor::LedgerHandle;

#![allow(dead_code)]

use family_ledger::LedgerHandle;
use family_ledger::service::ledger_actor;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct TestLedger {
    pub ledger: LedgerHandle,
    path: PathBuf,
}

impl TestLedger {
    /// A ledger over a fresh SQLite file in the temp dir.
    pub async fn open(tag: &str) -> Self {
        let path = temp_path(tag, "sqlite");
        let database_url = format!("sqlite:{}", path.display());
        let ledger = ledger_actor::open(&database_url)
            .await
            .expect("failed to open test ledger");
        Self { ledger, path }
    }

    pub async fn cleanup(self) {
        self.ledger
            .shutdown()
            .await
            .expect("failed to stop test ledger");
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn temp_path(tag: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "family-ledger-{tag}-{}-{}.{ext}",
        std::process::id(),
        nanos
    ));
    path
}

pub fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

use crate::error::LedgerError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "ledger.toml";
pub const ENV_PREFIX: &str = "LEDGER_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// sqlx SQLite URL, e.g. `sqlite:data.db`.
    pub database_url: String,
    pub loglevel: String,
    /// JSON file holding the selected user.
    pub preferences_path: PathBuf,
    /// Identity used when no user has been selected.
    pub default_user: String,
    /// Program invoked as `<cmd> <title> <message>`; unset logs instead.
    pub notify_command: Option<String>,
    /// Local hour `watch` wakes at on the 1st of each month.
    pub notify_hour: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data.db".to_string(),
            loglevel: "info".to_string(),
            preferences_path: PathBuf::from("local.json"),
            default_user: "Default".to_string(),
            notify_command: None,
            notify_hour: 9,
        }
    }
}

impl Config {
    /// Defaults, then `ledger.toml` if present, then `LEDGER_*` env vars.
    pub fn load() -> Result<Self, LedgerError> {
        Self::figment(Figment::new().merge(Toml::file(CONFIG_FILE)))
    }

    fn figment(sources: Figment) -> Result<Self, LedgerError> {
        let cfg = Figment::from(Serialized::defaults(Config::default()))
            .merge(sources)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let cfg = Config::figment(Figment::new().merge(Toml::string(
            r#"
            database_url = "sqlite:/tmp/family.db"
            notify_command = "notify-send"
            "#,
        )))
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite:/tmp/family.db");
        assert_eq!(cfg.notify_command.as_deref(), Some("notify-send"));
        assert_eq!(cfg.default_user, "Default");
        assert_eq!(cfg.notify_hour, 9);
    }
}

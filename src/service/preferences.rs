use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct PreferenceFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_user: Option<SelectedUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct SelectedUser {
    name: String,
}

/// UI preferences kept in a small JSON file next to the database:
/// `{"selected_user": {"name": "Alice"}}`.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    file: PreferenceFile,
}

impl Preferences {
    /// Load preferences from `path`. A missing file means nothing selected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "preferences file not found; using defaults");
            return Ok(Self {
                path,
                file: PreferenceFile::default(),
            });
        }
        let contents = fs::read_to_string(&path)?;
        let file: PreferenceFile = serde_json::from_str(&contents)?;
        Ok(Self { path, file })
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.file.selected_user.as_ref().map(|u| u.name.as_str())
    }

    /// The selected user, or `default` when nothing has been chosen yet.
    pub fn user_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.selected_user().unwrap_or(default)
    }

    /// Persist `name` as the selected user. Written to a sibling temp file
    /// and renamed into place.
    pub fn save_selected_user(&mut self, name: impl Into<String>) -> Result<(), LedgerError> {
        self.file.selected_user = Some(SelectedUser { name: name.into() });
        let body = serde_json::to_string_pretty(&self.file)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;

        info!(
            path = %self.path.display(),
            user = self.selected_user().unwrap_or_default(),
            "selected user saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut p = std::env::temp_dir();
        p.push(format!(
            "family-ledger-prefs-{tag}-{}-{}.json",
            std::process::id(),
            nanos
        ));
        p
    }

    #[test]
    fn missing_file_selects_nobody() {
        let prefs = Preferences::load(temp_path("missing")).unwrap();
        assert_eq!(prefs.selected_user(), None);
        assert_eq!(prefs.user_or("Default"), "Default");
    }

    #[test]
    fn saved_selection_survives_reload() {
        let path = temp_path("save");
        let mut prefs = Preferences::load(&path).unwrap();
        prefs.save_selected_user("Alice").unwrap();

        let reloaded = Preferences::load(&path).unwrap();
        assert_eq!(reloaded.selected_user(), Some("Alice"));

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["selected_user"]["name"], "Alice");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Preferences::load(&path), Err(LedgerError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}

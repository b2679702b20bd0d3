use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};
use vet_core::{SessionError, SessionKey, SessionStorage};

use crate::app_config::SessionConfig;

/// Session values kept in memory and, when a path is configured, mirrored
/// to a JSON file after every change.
#[derive(Debug, Default)]
pub struct SessionStore {
    values: RwLock<BTreeMap<String, String>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "Discarding unparseable session file");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), keys = values.len(), "Opened session store");
        Ok(Self {
            values: RwLock::new(values),
            path: Some(path),
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        match &config.path {
            Some(path) => Self::open(path),
            None => Ok(Self::in_memory()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), SessionError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = values.clone();
        change(&mut next);
        if let Some(path) = &self.path {
            let contents = serde_json::to_string_pretty(&next)?;
            write_atomic(path, contents.as_bytes()).inspect_err(|err| {
                warn!(path = %path.display(), error = %err, "Failed to persist session");
            })?;
        }
        *values = next;
        Ok(())
    }
}

/// Write to `{path}.tmp`, sync, then rename over `path` so a crash never
/// leaves a truncated session file behind.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)
}

impl SessionStorage for SessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
            .cloned()
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionError> {
        self.update(|values| {
            values.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: SessionKey) -> Result<(), SessionError> {
        self.update(|values| {
            values.remove(key.as_str());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_roundtrip() {
        let store = SessionStore::in_memory();
        assert_eq!(store.get(SessionKey::DateFrom), None);

        store.set(SessionKey::DateFrom, "2026-03-01").unwrap();
        store.set(SessionKey::JourneyId, "").unwrap();
        assert_eq!(store.get(SessionKey::DateFrom).as_deref(), Some("2026-03-01"));
        assert_eq!(store.get(SessionKey::JourneyId).as_deref(), Some(""));
        assert_eq!(store.get_non_empty(SessionKey::JourneyId), None);

        store.remove(SessionKey::DateFrom).unwrap();
        assert_eq!(store.get(SessionKey::DateFrom), None);
    }

    #[test]
    fn test_file_backed_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path).unwrap();
        store.set(SessionKey::AuthToken, "abc123").unwrap();
        store.set(SessionKey::LastOrderId, "ORD-9").unwrap();
        drop(store);

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.get(SessionKey::AuthToken).as_deref(), Some("abc123"));
        assert_eq!(reopened.get(SessionKey::LastOrderId).as_deref(), Some("ORD-9"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"auth_token\""));
    }

    #[test]
    fn test_truncated_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{\n  \"journeyid\": \"4").unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.get(SessionKey::JourneyId), None);

        store.set(SessionKey::JourneyId, "42").unwrap();
        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.get(SessionKey::JourneyId).as_deref(), Some("42"));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::open(&path).unwrap();
        store.set(SessionKey::DateFrom, "2026-03-01").unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path).unwrap();
        store.set(SessionKey::DateFrom, "2026-03-01").unwrap();

        // A non-empty directory at the target path makes the rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        assert!(matches!(
            store.set(SessionKey::DateFrom, "2026-04-01"),
            Err(SessionError::Io(_))
        ));
        assert_eq!(store.get(SessionKey::DateFrom).as_deref(), Some("2026-03-01"));
    }

    #[test]
    fn test_from_config() {
        let store = SessionStore::from_config(&SessionConfig::default()).unwrap();
        assert!(store.path().is_none());
    }
}

//! Snippet persistence over a small key-value seam.
//!
//! The on-disk backend keeps one file per key, last-write-wins, no expiry.
//! Reserved keys (the auto-saved draft, the theme) live under a `.` prefix
//! that snippet names are not allowed to use, so user snippets can never
//! collide with them.

use std::{collections::HashMap, fs, path::PathBuf, sync::Mutex};

use thiserror::Error;
use tracing::warn;

use crate::config::Config;

/// Reserved key for the auto-persisted working buffer.
pub const DRAFT_KEY: &str = ".draft";
/// Reserved key for the persisted color theme.
pub const THEME_KEY: &str = ".theme";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("snippet name must not be empty")]
    EmptyName,
    #[error("snippet not found: {0}")]
    NotFound(String),
    #[error("snippet name is reserved: {0}")]
    ReservedName(String),
}

/// Minimal persistent string map. Implemented by the on-disk store and by an
/// in-memory fake for tests.
pub trait KeyValue {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-per-key store rooted at the configured snippet directory.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn from_config(cfg: &Config) -> Self {
        Self::at(cfg.snippet_storage_path())
    }

    pub fn at(root: PathBuf) -> Self {
        let _ = fs::create_dir_all(&root);
        Self { root }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValue for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::write(self.file_path(key), value) {
            warn!(key, error = %e, "snippet write failed");
        }
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.file_path(key));
    }
}

/// In-memory store for tests and non-persistent sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.inner.lock().unwrap().remove(key);
    }
}

/// Named snippets plus the reserved draft slot, on top of any [`KeyValue`].
#[derive(Debug)]
pub struct SnippetStore<K: KeyValue> {
    kv: K,
}

impl SnippetStore<DirStore> {
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(DirStore::from_config(cfg))
    }
}

impl<K: KeyValue> SnippetStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn validate_name(name: &str) -> Result<&str, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if name.starts_with('.') || name.contains('/') || name.contains('\\') {
            return Err(StoreError::ReservedName(name.to_string()));
        }
        Ok(name)
    }

    pub fn save(&self, name: &str, code: &str) -> Result<(), StoreError> {
        let name = Self::validate_name(name)?;
        self.kv.set(name, code);
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<String, StoreError> {
        let name = Self::validate_name(name)?;
        self.kv.get(name).ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn save_draft(&self, code: &str) {
        self.kv.set(DRAFT_KEY, code);
    }

    pub fn load_draft(&self) -> Option<String> {
        self.kv.get(DRAFT_KEY)
    }

    pub fn save_theme(&self, theme: &str) {
        self.kv.set(THEME_KEY, theme);
    }

    pub fn load_theme(&self) -> Option<String> {
        self.kv.get(THEME_KEY)
    }
}

impl SnippetStore<DirStore> {
    /// Saved snippet names, sorted. Reserved keys are excluded.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.kv.root)
            .map(|rd| {
                rd.filter_map(|e| e.ok())
                    .filter_map(|e| e.file_name().into_string().ok())
                    .filter(|n| !n.starts_with('.'))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SnippetStore<MemoryStore> {
        SnippetStore::new(MemoryStore::default())
    }

    #[test]
    fn save_then_load_round_trips() {
        let s = store();
        s.save("greet", "print('hi')").unwrap();
        assert_eq!(s.load("greet").unwrap(), "print('hi')");
    }

    #[test]
    fn resave_overwrites() {
        let s = store();
        s.save("greet", "v1").unwrap();
        s.save("greet", "v2").unwrap();
        assert_eq!(s.load("greet").unwrap(), "v2");
    }

    #[test]
    fn load_missing_is_not_found() {
        let s = store();
        assert_eq!(s.load("nope"), Err(StoreError::NotFound("nope".into())));
    }

    #[test]
    fn blank_names_rejected_and_store_unchanged() {
        let s = store();
        assert_eq!(s.save("", "x"), Err(StoreError::EmptyName));
        assert_eq!(s.save("  ", "x"), Err(StoreError::EmptyName));
        assert_eq!(s.load(""), Err(StoreError::EmptyName));
        // Nothing leaked into the backing map.
        assert!(s.kv.get("").is_none());
        assert!(s.kv.get("  ").is_none());
    }

    #[test]
    fn reserved_names_rejected() {
        let s = store();
        assert!(matches!(s.save(".draft", "x"), Err(StoreError::ReservedName(_))));
        assert!(matches!(s.save("a/b", "x"), Err(StoreError::ReservedName(_))));
        assert!(matches!(s.save("..\\up", "x"), Err(StoreError::ReservedName(_))));
    }

    #[test]
    fn draft_round_trip_and_empty_first_run() {
        let s = store();
        assert_eq!(s.load_draft(), None);
        s.save_draft("print(1)");
        assert_eq!(s.load_draft(), Some("print(1)".into()));
    }

    #[test]
    fn draft_does_not_shadow_snippets() {
        let s = store();
        s.save_draft("draft text");
        s.save("draft", "snippet text").unwrap();
        assert_eq!(s.load("draft").unwrap(), "snippet text");
        assert_eq!(s.load_draft(), Some("draft text".into()));
    }

    #[test]
    fn names_are_trimmed() {
        let s = store();
        s.save(" greet ", "x").unwrap();
        assert_eq!(s.load("greet").unwrap(), "x");
    }
}

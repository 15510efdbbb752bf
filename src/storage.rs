//! Persistence of the per-letter enable flags.
//!
//! The whole configuration is one flat JSON object (letter -> enabled) under
//! a single localStorage key. There is no version field: schema evolution is
//! a key-presence merge against the canonical default set at load time. The
//! backend is abstracted behind [`SettingsStore`] so the merge logic can be
//! tested against an in-memory store.

use std::collections::BTreeMap;
use std::fmt;

/// Mapping from letter symbol to its enabled flag.
pub type LetterSet = BTreeMap<String, bool>;

/// Well-known storage key for the persisted letter map.
pub const LETTERS_KEY: &str = "letters";

#[derive(Debug)]
pub enum StorageError {
    /// localStorage is disabled or absent in this browsing context.
    Unavailable,
    /// The backend rejected the read or write.
    Backend(String),
    /// The persisted blob is not a valid letter map. Not recovered here:
    /// callers decide the fallback policy.
    Corrupt(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "localStorage is not available"),
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
            StorageError::Corrupt(err) => write!(f, "stored letter settings are corrupt: {}", err),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Corrupt(err) => Some(err),
            _ => None,
        }
    }
}

/// String key-value port over the persistence backend.
pub trait SettingsStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The browser's localStorage.
pub struct BrowserStore;

impl SettingsStore for BrowserStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?
            .get_item(key)
            .map_err(|err| StorageError::Backend(format!("{:?}", err)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(format!("{:?}", err)))
    }
}

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    gloo_utils::window()
        .local_storage()
        .map_err(|err| StorageError::Backend(format!("{:?}", err)))?
        .ok_or(StorageError::Unavailable)
}

/// Loads the letter map, reconciling it with the canonical default schema.
///
/// Nothing stored yet: the defaults are persisted and returned. Otherwise the
/// stored map is merged key-by-key against `defaults` (stored values win for
/// keys that still exist, new keys take their default, removed keys are
/// dropped) and the merge is written back only if it differs from what was
/// stored. A corrupt blob is a hard error.
pub fn load(store: &impl SettingsStore, defaults: &LetterSet) -> Result<LetterSet, StorageError> {
    let Some(raw) = store.read(LETTERS_KEY)? else {
        save(store, defaults)?;
        return Ok(defaults.clone());
    };

    let stored: LetterSet = serde_json::from_str(&raw).map_err(StorageError::Corrupt)?;
    let merged: LetterSet = defaults
        .iter()
        .map(|(letter, &enabled)| {
            let value = stored.get(letter).copied().unwrap_or(enabled);
            (letter.clone(), value)
        })
        .collect();

    if merged != stored {
        save(store, &merged)?;
    }
    Ok(merged)
}

/// Persists the whole letter map.
pub fn save(store: &impl SettingsStore, letters: &LetterSet) -> Result<(), StorageError> {
    let raw = serde_json::to_string(letters).map_err(StorageError::Corrupt)?;
    store.write(LETTERS_KEY, &raw)
}

/// Turns a single letter off and persists the result.
pub fn disable_letter(
    store: &impl SettingsStore,
    defaults: &LetterSet,
    letter: &str,
) -> Result<LetterSet, StorageError> {
    let mut letters = load(store, defaults)?;
    if let Some(enabled) = letters.get_mut(letter) {
        *enabled = false;
        save(store, &letters)?;
    }
    Ok(letters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        data: RefCell<HashMap<String, String>>,
        writes: RefCell<usize>,
    }

    impl MemoryStore {
        fn with(key: &str, value: &str) -> Self {
            let store = Self::default();
            store.data.borrow_mut().insert(key.into(), value.into());
            store
        }

        fn raw(&self, key: &str) -> Option<String> {
            self.data.borrow().get(key).cloned()
        }

        fn writes(&self) -> usize {
            *self.writes.borrow()
        }
    }

    impl SettingsStore for MemoryStore {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.data.borrow().get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.data.borrow_mut().insert(key.into(), value.into());
            *self.writes.borrow_mut() += 1;
            Ok(())
        }
    }

    fn letter_set(entries: &[(&str, bool)]) -> LetterSet {
        entries
            .iter()
            .map(|(letter, enabled)| (letter.to_string(), *enabled))
            .collect()
    }

    #[test]
    fn load_persists_defaults_when_empty() {
        let store = MemoryStore::default();
        let defaults = letter_set(&[("A", true), ("B", false), ("C", true)]);

        let loaded = load(&store, &defaults).unwrap();
        assert_eq!(loaded, defaults);
        assert_eq!(
            store.raw(LETTERS_KEY).unwrap(),
            serde_json::to_string(&defaults).unwrap()
        );
    }

    #[test]
    fn load_prefers_stored_values() {
        let store = MemoryStore::with(LETTERS_KEY, r#"{"A":false,"B":true,"C":false}"#);
        let defaults = letter_set(&[("A", true), ("B", true), ("C", true)]);

        let loaded = load(&store, &defaults).unwrap();
        assert_eq!(loaded, letter_set(&[("A", false), ("B", true), ("C", false)]));
        // Nothing changed by the merge, so nothing is rewritten.
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn load_merges_new_keys_and_rewrites() {
        let store = MemoryStore::with(LETTERS_KEY, r#"{"A":false,"B":true}"#);
        let defaults = letter_set(&[("A", true), ("B", true), ("C", true)]);

        let loaded = load(&store, &defaults).unwrap();
        let expected = letter_set(&[("A", false), ("B", true), ("C", true)]);
        assert_eq!(loaded, expected);
        assert_eq!(
            store.raw(LETTERS_KEY).unwrap(),
            serde_json::to_string(&expected).unwrap()
        );
    }

    #[test]
    fn load_drops_removed_keys() {
        let store = MemoryStore::with(LETTERS_KEY, r#"{"A":false,"B":true,"C":false}"#);
        let defaults = letter_set(&[("A", true), ("B", true)]);

        let loaded = load(&store, &defaults).unwrap();
        assert_eq!(loaded, letter_set(&[("A", false), ("B", true)]));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn corrupt_blob_is_a_hard_error() {
        let store = MemoryStore::with(LETTERS_KEY, "not json");
        let defaults = letter_set(&[("A", true)]);

        let err = load(&store, &defaults).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
        // No silent fallback: the stored blob is left untouched.
        assert_eq!(store.raw(LETTERS_KEY).unwrap(), "not json");
    }

    #[test]
    fn save_writes_flat_json() {
        let store = MemoryStore::default();
        let letters = letter_set(&[("A", false), ("B", true)]);

        save(&store, &letters).unwrap();
        assert_eq!(store.raw(LETTERS_KEY).unwrap(), r#"{"A":false,"B":true}"#);
    }

    #[test]
    fn disable_letter_flips_and_persists() {
        let store = MemoryStore::with(LETTERS_KEY, r#"{"A":true,"B":true}"#);
        let defaults = letter_set(&[("A", true), ("B", true)]);

        let letters = disable_letter(&store, &defaults, "A").unwrap();
        assert_eq!(letters, letter_set(&[("A", false), ("B", true)]));
        assert_eq!(store.raw(LETTERS_KEY).unwrap(), r#"{"A":false,"B":true}"#);
    }

    #[test]
    fn disable_unknown_letter_is_a_no_op() {
        let store = MemoryStore::with(LETTERS_KEY, r#"{"A":true}"#);
        let defaults = letter_set(&[("A", true)]);

        let letters = disable_letter(&store, &defaults, "Z").unwrap();
        assert_eq!(letters, letter_set(&[("A", true)]));
        assert_eq!(store.writes(), 0);
    }
}

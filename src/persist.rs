//! The state container: one [`AppState`] mirrored into a key-value store.
//!
//! Loading never fails. A missing key gives the defaults, an unreadable blob
//! is logged and replaced by the defaults. After every accepted action the
//! whole record is written back under the same key.

use std::collections::HashMap;

use crate::config::GameConfig;
use crate::error::{EarthError, Rejection};
use crate::logging;
use crate::reducer::{Action, Effect, Transition, reduce};
use crate::state::AppState;

/// String key-value persistence, the shape of `window.localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, EarthError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), EarthError>;
    fn remove(&mut self, key: &str) -> Result<(), EarthError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, EarthError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), EarthError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), EarthError> {
        (**self).remove(key)
    }
}

/// In-memory backend for tests and for browsers with storage disabled.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, EarthError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), EarthError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), EarthError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::KeyValueStore;
    use crate::error::EarthError;

    fn js_err(e: wasm_bindgen::JsValue) -> EarthError {
        EarthError::Storage(format!("{e:?}"))
    }

    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        pub fn open() -> Result<Self, EarthError> {
            let win = web_sys::window().ok_or(EarthError::StorageUnavailable)?;
            match win.local_storage() {
                Ok(Some(storage)) => Ok(Self { storage }),
                _ => Err(EarthError::StorageUnavailable),
            }
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>, EarthError> {
            self.storage.get_item(key).map_err(js_err)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), EarthError> {
            self.storage.set_item(key, value).map_err(js_err)
        }

        fn remove(&mut self, key: &str) -> Result<(), EarthError> {
            self.storage.remove_item(key).map_err(js_err)
        }
    }
}

pub struct Store<S: KeyValueStore> {
    backend: S,
    key: String,
    state: AppState,
}

impl<S: KeyValueStore> Store<S> {
    /// Read the stored record or start fresh.
    pub fn load(backend: S, key: &str, story_count: usize) -> Self {
        let state = match backend.get(key) {
            Ok(Some(raw)) => match AppState::from_json(&raw) {
                Ok(st) => st.sanitized(story_count),
                Err(e) => {
                    logging::warn(&format!("stored state unreadable, starting fresh: {e}"));
                    AppState::default()
                }
            },
            Ok(None) => AppState::default(),
            Err(e) => {
                logging::warn(&format!("could not read stored state: {e}"));
                AppState::default()
            }
        };
        Self { backend, key: key.to_string(), state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn save(&mut self) -> Result<(), EarthError> {
        let json = self.state.to_json()?;
        self.backend.set(&self.key, &json)
    }

    /// Run `action` through the reducer. On success the new record replaces
    /// the old one and is written back; `ClearStorage` removes the key instead.
    /// A rejection leaves both memory and storage untouched.
    pub fn dispatch(&mut self, action: Action, now_ms: u64, cfg: &GameConfig) -> Result<Transition, Rejection> {
        let t = reduce(&self.state, action, now_ms, cfg)?;
        let changed = t.state != self.state;
        self.state = t.state.clone();
        if t.effects.contains(&Effect::ClearStorage) {
            if let Err(e) = self.backend.remove(&self.key) {
                logging::error(&format!("clearing stored state failed: {e}"));
            }
        } else if changed {
            if let Err(e) = self.save() {
                logging::error(&format!("saving state failed: {e}"));
            }
        }
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STORAGE_KEY;
    use crate::reducer::CheckInChoice;
    use crate::state::EarthState;

    #[test]
    fn missing_key_gives_defaults() {
        let store = Store::load(MemoryStore::new(), STORAGE_KEY, 10);
        assert_eq!(*store.state(), AppState::default());
    }

    #[test]
    fn garbage_gives_defaults() {
        let store = Store::load(MemoryStore::with(STORAGE_KEY, "{{{"), STORAGE_KEY, 10);
        assert_eq!(*store.state(), AppState::default());
    }

    #[test]
    fn legacy_blob_keeps_present_fields() {
        let legacy = r#"{"mode":"kid","kidName":"Ada","earthState":"Damaged","shieldsRemaining":1,
            "consecutiveMisses":1,"approvedPhotos":3,"badgeCount":2,"lastCheckInDate":"2024-05-01"}"#;
        let store = Store::load(MemoryStore::with(STORAGE_KEY, legacy), STORAGE_KEY, 10);
        let st = store.state();
        assert_eq!(st.kid_name, "Ada");
        assert_eq!(st.earth_state, EarthState::Damaged);
        assert_eq!(st.approved_photos, 3);
        assert_eq!(st.streak, 0);
        assert_eq!(st.last_check_in_timestamp, None);
    }

    #[test]
    fn accepted_actions_are_saved() {
        let cfg = GameConfig::default();
        let mut store = Store::load(MemoryStore::new(), STORAGE_KEY, 10);
        store.dispatch(Action::CheckIn(CheckInChoice::Skip), 1_000, &cfg).unwrap();
        let raw = store.backend().get(STORAGE_KEY).unwrap().unwrap();
        let saved = AppState::from_json(&raw).unwrap();
        assert_eq!(saved, *store.state());
        assert_eq!(saved.consecutive_misses, 1);
    }

    #[test]
    fn rejected_actions_change_nothing() {
        let cfg = GameConfig::default();
        let mut store = Store::load(MemoryStore::new(), STORAGE_KEY, 10);
        store.dispatch(Action::CheckIn(CheckInChoice::Skip), 1_000, &cfg).unwrap();
        let before = store.backend().get(STORAGE_KEY).unwrap();
        assert!(store.dispatch(Action::CheckIn(CheckInChoice::Skip), 2_000, &cfg).is_err());
        assert_eq!(store.backend().get(STORAGE_KEY).unwrap(), before);
        assert_eq!(store.state().consecutive_misses, 1);
    }

    #[test]
    fn clear_data_removes_key() {
        let cfg = GameConfig::default();
        let mut store = Store::load(MemoryStore::new(), STORAGE_KEY, 10);
        store.dispatch(Action::AwardBadge, 0, &cfg).unwrap();
        assert!(store.backend().get(STORAGE_KEY).unwrap().is_some());
        store.dispatch(Action::ClearData, 0, &cfg).unwrap();
        assert!(store.backend().get(STORAGE_KEY).unwrap().is_none());
        assert_eq!(*store.state(), AppState::default());
    }
}

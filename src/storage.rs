//! Persistence boundary for the game record and player settings.

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{CONFIG_KEY, Config, SETTINGS_KEY, STATE_KEY, Settings};
use crate::model::GameState;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage access failed: {0}")]
    Access(String),
    #[error("stored record is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Raw key/value backend.
pub trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Browser `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn store(&self) -> Result<web_sys::Storage, StorageError> {
        let win = web_sys::window().ok_or(StorageError::Unavailable)?;
        win.local_storage()
            .map_err(|e| StorageError::Access(format!("{e:?}")))?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValue for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.store()?
            .get_item(key)
            .map_err(|e| StorageError::Access(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store()?
            .set_item(key, value)
            .map_err(|e| StorageError::Access(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store()?
            .remove_item(key)
            .map_err(|e| StorageError::Access(format!("{e:?}")))
    }
}

/// In-memory backend for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValue for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Load/save of the game record plus settings, over any `KeyValue` backend.
pub struct GameStore<B: KeyValue> {
    backend: B,
}

impl<B: KeyValue> GameStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<GameState>, StorageError> {
        self.read(STATE_KEY)
    }

    pub fn save(&self, state: &GameState) -> Result<(), StorageError> {
        self.write(STATE_KEY, state)
    }

    /// Saved record or defaults; failures are logged, never surfaced.
    pub fn load_or_default(&self) -> GameState {
        match self.load() {
            Ok(Some(state)) => {
                debug!(items = state.placed_items.len(), "loaded saved game");
                state
            }
            Ok(None) => GameState::default(),
            Err(err) => {
                warn!(%err, "failed to load saved state");
                GameState::default()
            }
        }
    }

    pub fn save_logged(&self, state: &GameState) {
        if let Err(err) = self.save(state) {
            warn!(%err, "failed to save state");
        }
    }

    pub fn load_settings(&self) -> Settings {
        self.read(SETTINGS_KEY).unwrap_or_else(|err| {
            warn!(%err, "failed to load settings");
            None
        })
        .unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) {
        if let Err(err) = self.write(SETTINGS_KEY, settings) {
            warn!(%err, "failed to save settings");
        }
    }

    /// Defaults overridden by whatever JSON sits under the config key.
    pub fn load_config(&self) -> Config {
        match self.backend.get(CONFIG_KEY) {
            Ok(Some(raw)) => Config::from_json(&raw).unwrap_or_else(|err| {
                warn!(%err, "ignoring malformed config override");
                Config::default()
            }),
            Ok(None) => Config::default(),
            Err(err) => {
                warn!(%err, "config override unreadable");
                Config::default()
            }
        }
    }

    /// Wipes the game record and settings.
    pub fn clear(&self) {
        for key in [STATE_KEY, SETTINGS_KEY] {
            if let Err(err) = self.backend.remove(key) {
                warn!(%err, key, "failed to clear storage key");
            }
        }
    }
}

impl GameStore<LocalStorage> {
    pub fn browser() -> Self {
        Self::new(LocalStorage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderStyle;
    use crate::model::{PlacedItem, shop_catalogue};

    #[test]
    fn save_then_load_keeps_persisted_fields_only() {
        let store = GameStore::new(MemoryStorage::default());
        let mut state = GameState::default();
        state.funds = 55;
        state.placed_items.push(PlacedItem { index: 4, item: shop_catalogue()[0].clone() });
        state.status = "transient".into();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.funds, 55);
        assert_eq!(loaded.placed_items, state.placed_items);
        assert!(loaded.status.is_empty());
    }

    #[test]
    fn empty_store_loads_nothing() {
        let store = GameStore::new(MemoryStorage::default());
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.load_or_default(), GameState::default());
    }

    #[test]
    fn malformed_record_is_an_error_but_defaults_survive() {
        let backend = MemoryStorage::default();
        backend.set(STATE_KEY, "{not json").unwrap();
        let store = GameStore::new(backend);
        assert!(matches!(store.load(), Err(StorageError::Serde(_))));
        assert_eq!(store.load_or_default().funds, 100);
    }

    #[test]
    fn settings_and_clear() {
        let store = GameStore::new(MemoryStorage::default());
        store.save_settings(&Settings { loader_style: LoaderStyle::Inline });
        store.save_logged(&GameState::default());
        assert_eq!(store.load_settings().loader_style, LoaderStyle::Inline);
        store.clear();
        assert_eq!(store.load_settings(), Settings::default());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn config_override_is_partial() {
        let backend = MemoryStorage::default();
        backend.set(CONFIG_KEY, r#"{"map":{"cols":8}}"#).unwrap();
        let cfg = GameStore::new(backend).load_config();
        assert_eq!(cfg.map.cols, 8);
        assert_eq!(cfg.map.rows, 4);
    }
}

//! Browser localStorage as a key-value store

use wasm_bindgen::JsValue;

use crate::error::{CoachError, Result};
use crate::exercise::KeyValueStore;

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| CoachError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| CoachError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

fn storage_error(err: JsValue) -> CoachError {
    CoachError::Storage(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}

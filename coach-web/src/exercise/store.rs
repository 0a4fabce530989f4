//! Calibration persistence over a key-value storage collaborator
//!
//! The browser build plugs in localStorage; native code and tests use
//! [`MemoryStore`].

use std::collections::HashMap;

use super::calibration::ExerciseCalibration;
use crate::error::Result;

/// String key-value storage (browser-durable storage in production)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Typed calibration records keyed by exercise id
pub struct CalibrationStore<S> {
    store: S,
}

impl<S: KeyValueStore> CalibrationStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn key(exercise_id: &str) -> String {
        format!("calibration:{exercise_id}")
    }

    pub fn load(&self, exercise_id: &str) -> Result<Option<ExerciseCalibration>> {
        match self.store.get(&Self::key(exercise_id))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save(&mut self, exercise_id: &str, calibration: &ExerciseCalibration) -> Result<()> {
        let json = serde_json::to_string(calibration)?;
        self.store.set(&Self::key(exercise_id), &json)?;
        log::info!("saved calibration for {exercise_id}");
        Ok(())
    }

    pub fn clear(&mut self, exercise_id: &str) -> Result<()> {
        self.store.remove(&Self::key(exercise_id))
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;

    #[test]
    fn test_save_then_load() {
        let mut store = CalibrationStore::new(MemoryStore::new());
        let cal = ExerciseCalibration::new(160.0, 45.0, 140.0);
        store.save("bicep_curl", &cal).unwrap();
        assert_eq!(store.load("bicep_curl").unwrap(), Some(cal));
        assert_eq!(store.load("squat").unwrap(), None);
    }

    #[test]
    fn test_storage_format() {
        let mut store = CalibrationStore::new(MemoryStore::new());
        store.save("squat", &ExerciseCalibration::DEFAULT).unwrap();
        let raw = store.into_inner().get("calibration:squat").unwrap().unwrap();
        assert_eq!(raw, r#"{"startAngle":170.0,"targetAngle":90.0,"completionThreshold":160.0}"#);
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let mut kv = MemoryStore::new();
        kv.set("calibration:squat", "not json").unwrap();
        let store = CalibrationStore::new(kv);
        assert!(matches!(store.load("squat"), Err(CoachError::Serialization(_))));
    }

    #[test]
    fn test_clear() {
        let mut store = CalibrationStore::new(MemoryStore::new());
        store.save("squat", &ExerciseCalibration::DEFAULT).unwrap();
        store.clear("squat").unwrap();
        assert_eq!(store.load("squat").unwrap(), None);
    }
}

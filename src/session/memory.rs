use std::collections::HashMap;
use std::sync::Mutex;

use super::{ SessionKey, SessionStore };
use crate::api::ApiError;

#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<SessionKey, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, ApiError> {
        let values = self.values.lock().map_err(|e| ApiError::Session(e.to_string()))?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), ApiError> {
        let mut values = self.values.lock().map_err(|e| ApiError::Session(e.to_string()))?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<(), ApiError> {
        let mut values = self.values.lock().map_err(|e| ApiError::Session(e.to_string()))?;
        values.remove(&key);
        Ok(())
    }
}

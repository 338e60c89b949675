use log::{ info, warn };
use serde_json::{ Map, Value as JsonValue };
use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::Mutex;

use super::{ SessionKey, SessionStore };
use crate::api::ApiError;

/// Flat JSON object on disk, `{ "token": "...", "user": "...", ... }`.
/// Values are strings, exactly as the browser keeps them.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, JsonValue>, ApiError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(
                    ApiError::Session(format!("Failed to read {}: {}", self.path.display(), e))
                );
            }
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<JsonValue>(&raw) {
            Ok(JsonValue::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!("Session file {} is unreadable, starting fresh", self.path.display());
                Ok(Map::new())
            }
        }
    }

    fn write_all(&self, map: Map<String, JsonValue>) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ApiError::Session(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(&JsonValue::Object(map))?;
        fs::write(&self.path, raw).map_err(|e|
            ApiError::Session(format!("Failed to write {}: {}", self.path.display(), e))
        )
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, ApiError> {
        let _guard = self.lock.lock().map_err(|e| ApiError::Session(e.to_string()))?;
        let map = self.read_all()?;
        Ok(
            map.get(key.as_str()).map(|value| match value {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            })
        )
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), ApiError> {
        let _guard = self.lock.lock().map_err(|e| ApiError::Session(e.to_string()))?;
        let mut map = self.read_all()?;
        map.insert(key.as_str().to_string(), JsonValue::String(value.to_string()));
        self.write_all(map)
    }

    fn remove(&self, key: SessionKey) -> Result<(), ApiError> {
        let _guard = self.lock.lock().map_err(|e| ApiError::Session(e.to_string()))?;
        let mut map = self.read_all()?;
        if map.remove(key.as_str()).is_some() {
            info!("Removed '{}' from {}", key.as_str(), self.path.display());
            self.write_all(map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn values_survive_a_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        FileSessionStore::new(&path).set(SessionKey::Token, "jwt-123").unwrap();
        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get(SessionKey::Token).unwrap().as_deref(), Some("jwt-123"));
    }

    #[test]
    fn garbage_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "[[[").unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.get(SessionKey::Token).unwrap(), None);
        store.set(SessionKey::Theme, "dark").unwrap();
        assert_eq!(store.get(SessionKey::Theme).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn remove_only_touches_one_key() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        store.set(SessionKey::Token, "t").unwrap();
        store.set(SessionKey::Language, "ar").unwrap();
        store.remove(SessionKey::Token).unwrap();

        assert_eq!(store.get(SessionKey::Token).unwrap(), None);
        assert_eq!(store.get(SessionKey::Language).unwrap().as_deref(), Some("ar"));
    }
}

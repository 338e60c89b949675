mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use log::warn;
use std::sync::Arc;

use crate::api::ApiError;
use crate::config::preferences::{ Language, Theme };
use crate::models::profile::Profile;

/// Keys of the persisted browser-style session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    User,
    Theme,
    Language,
}

impl SessionKey {
    pub const ALL: [SessionKey; 4] = [
        SessionKey::Token,
        SessionKey::User,
        SessionKey::Theme,
        SessionKey::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::User => "user",
            SessionKey::Theme => "theme",
            SessionKey::Language => "language",
        }
    }
}

/// Raw string storage, one value per key.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Result<Option<String>, ApiError>;
    fn set(&self, key: SessionKey, value: &str) -> Result<(), ApiError>;
    fn remove(&self, key: SessionKey) -> Result<(), ApiError>;
}

/// What the `user` slot currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedUser {
    Missing,
    Corrupt,
    Present(Profile),
}

/// Typed access to the session store. This is the only place that knows how
/// the token and cached user are laid out.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    pub fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.get(SessionKey::Token)?.filter(|t| !t.trim().is_empty()))
    }

    pub fn set_token(&self, token: &str) -> Result<(), ApiError> {
        self.store.set(SessionKey::Token, token)
    }

    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.token()?.is_some())
    }

    pub fn user(&self) -> Result<CachedUser, ApiError> {
        let raw = match self.store.get(SessionKey::User)? {
            Some(raw) => raw,
            None => return Ok(CachedUser::Missing),
        };
        match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) => Ok(CachedUser::Present(profile)),
            Err(e) => {
                warn!("Cached user is not valid JSON ({}), ignoring it", e);
                Ok(CachedUser::Corrupt)
            }
        }
    }

    pub fn set_user(&self, profile: &Profile) -> Result<(), ApiError> {
        let raw = serde_json::to_string(profile)?;
        self.store.set(SessionKey::User, &raw)
    }

    /// Forgets the credentials; display preferences survive a logout.
    pub fn clear(&self) -> Result<(), ApiError> {
        self.store.remove(SessionKey::Token)?;
        self.store.remove(SessionKey::User)
    }

    pub fn theme(&self) -> Result<Theme, ApiError> {
        Ok(self.store
            .get(SessionKey::Theme)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), ApiError> {
        self.store.set(SessionKey::Theme, theme.as_str())
    }

    pub fn language(&self) -> Result<Language, ApiError> {
        Ok(self.store
            .get(SessionKey::Language)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_language(&self, language: Language) -> Result<(), ApiError> {
        self.store.set(SessionKey::Language, language.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_user_is_reported_not_fatal() {
        let store = Arc::new(MemorySessionStore::default());
        store.set(SessionKey::User, "{not json").unwrap();
        let session = Session::new(store);
        assert_eq!(session.user().unwrap(), CachedUser::Corrupt);
    }

    #[test]
    fn clear_keeps_preferences() {
        let session = Session::in_memory();
        session.set_token("abc").unwrap();
        session.set_theme(Theme::Dark).unwrap();
        session.clear().unwrap();

        assert!(!session.is_authenticated().unwrap());
        assert_eq!(session.theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn blank_token_counts_as_logged_out() {
        let session = Session::in_memory();
        session.set_token("   ").unwrap();
        assert_eq!(session.token().unwrap(), None);
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let store = Arc::new(MemorySessionStore::default());
        store.set(SessionKey::Language, "klingon").unwrap();
        assert_eq!(Session::new(store).language().unwrap(), Language::English);
    }
}

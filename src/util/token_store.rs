//! Durable storage for the session token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser store wraps `localStorage`; the in-memory store serves SSR and
//! tests. Storage failures never reach callers: an unavailable store reads
//! as "no token" and writes become no-ops, which degrades to being logged out
//! on the next load.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::sync::{Arc, Mutex, PoisonError};

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// `localStorage`-backed store. Outside the browser every call is a no-op.
#[derive(Clone, Debug)]
pub struct LocalStorageTokenStore {
    key: String,
}

impl LocalStorageTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[cfg(feature = "hydrate")]
    fn storage() -> Option<web_sys::Storage> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::debug!("localStorage unavailable; token persistence disabled");
        }
        storage
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let raw = Self::storage()?.get_item(&self.key).ok().flatten()?;
            non_empty(raw)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = Self::storage() else {
                return;
            };
            if storage.set_item(&self.key, token).is_err() {
                log::warn!("failed to persist session token");
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = Self::storage() {
                let _ = storage.remove_item(&self.key);
            }
        }
    }
}

/// Process-local store.
#[derive(Debug)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
    available: bool,
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self { token: Mutex::new(None), available: true }
    }
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that behaves like blocked or full browser storage.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { token: Mutex::new(None), available: false }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        if !self.available {
            return None;
        }
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .and_then(non_empty)
    }

    fn save(&self, token: &str) {
        if !self.available {
            return;
        }
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn non_empty(raw: String) -> Option<String> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}

/// Store for the current build target under `key`.
#[must_use]
pub fn default_token_store(key: &str) -> Arc<dyn TokenStore> {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(LocalStorageTokenStore::new(key))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        Arc::new(MemoryTokenStore::new())
    }
}

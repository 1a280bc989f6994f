//! Synchronous key/value persistence.
//!
//! Everything listo persists goes through [`KeyValueStore`], a JSON-valued
//! map with `get`/`set`. Callers never see which backend holds the data:
//!
//! - [`MemoryStore`]: process-local map, used by tests.
//! - [`FileStore`]: one JSON object file, rewritten atomically per write.
//! - [`CookieJar`]: the legacy cookie-header file, read by the migrator only.

mod cookie;
mod file;
mod memory;

pub use cookie::CookieJar;
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::model::Section;

/// Key holding the full item collection.
pub const TODO_KEY: &str = "todoList";

/// Prefix of the per-section ordering keys (`todoOrder-<section>`).
pub const ORDER_KEY: &str = "todoOrder";

/// Key holding the schema version marker.
pub const VERSION_KEY: &str = "version";

/// Cookie-era consent flag. Never copied forward.
pub const CONSENT_KEY: &str = "essentialCookiesConsent";

/// Storage key of a section's ordering.
#[must_use]
pub fn order_key(section: Section) -> String {
    format!("{ORDER_KEY}-{}", section.as_str())
}

/// A synchronous JSON key/value backend.
pub trait KeyValueStore {
    /// Read a value, `None` when absent.
    fn get(&self, name: &str) -> Option<Value>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist the value.
    fn set(&mut self, name: &str, value: Value) -> Result<(), StoreError>;

    /// Delete a value. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist the removal.
    fn remove(&mut self, name: &str) -> Result<(), StoreError>;

    /// Names of all stored keys.
    fn keys(&self) -> Vec<String>;

    /// Read and decode a value. Malformed data reads as absent.
    fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T>
    where
        Self: Sized,
    {
        let value = self.get(name)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::debug!(key = name, error = %err, "ignoring malformed stored value");
                None
            }
        }
    }

    /// Encode and write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or persisting fails.
    fn set_as<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            name: name.to_string(),
            source,
        })?;
        self.set(name, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, name: &str) -> Option<Value> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(name, value)
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).remove(name)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// The cookie-era backend, which the migrator drains into the current store.
pub trait LegacyStore {
    /// Read one entry, `None` when absent or undecodable.
    fn read(&self, name: &str) -> Option<Value>;

    /// All decodable entries.
    fn entries(&self) -> Vec<(String, Value)>;

    /// Drop every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be cleared.
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<S: LegacyStore + ?Sized> LegacyStore for &mut S {
    fn read(&self, name: &str) -> Option<Value> {
        (**self).read(name)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        (**self).entries()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

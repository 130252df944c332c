/// Key-value persistence behind chrome.storage.local

use crate::error::{Result, StashError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// `StashData` record
pub const STASH_DATA_KEY: &str = "stashData";
/// `Settings` record
pub const SETTINGS_KEY: &str = "settings";
/// `Notes` record
pub const NOTES_KEY: &str = "stashNotesData";
/// Pending delta queue
pub const DELTAS_KEY: &str = "stashDeltas";

/// Async get/set of JSON values by key.
///
/// Each call suspends on the host; two callers (popup and background) may
/// interleave between a `get` and the following `set`.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Read and decode a record, falling back to its default when unset
pub async fn read_record<S, T>(store: &S, key: &str) -> Result<T>
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| StashError::Storage(format!("Failed to parse {}: {}", key, e))),
    }
}

pub async fn write_record<S, T>(store: &S, key: &str, record: &T) -> Result<()>
where
    S: KeyValueStore,
    T: Serialize,
{
    let value = serde_json::to_value(record)
        .map_err(|e| StashError::Storage(format!("Failed to serialize {}: {}", key, e)))?;
    store.set(key, value).await
}

/// In-process store for tests and hosts without chrome.storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Raw stored value, bypassing the async interface
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

use serde::{de::DeserializeOwned, Serialize};

/// Durable key-value persistence surface for the session. Writes are
/// best-effort: if the backing store is unavailable (storage disabled,
/// quota) the value simply stays unpersisted for this tab session.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Browser localStorage implementation.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        match local_storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("⚠️ localStorage write failed for '{}'", key);
                }
            }
            None => log::warn!("⚠️ localStorage unavailable, '{}' not persisted", key),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory storage. Stands in for localStorage in tests and in
/// non-browser builds.
#[derive(Default)]
pub struct MemoryStorage {
    entries: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Persist a value as JSON. Serialization failures are logged and dropped,
/// matching the best-effort write contract.
pub fn save_json<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => storage.set(key, &json),
        Err(e) => log::warn!("⚠️ Could not serialize '{}' for storage: {}", key, e),
    }
}

/// Load a JSON value; any missing or corrupt entry reads as `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let json = storage.get(key)?;
    serde_json::from_str(&json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token"), None);

        storage.set("token", "abc");
        assert_eq!(storage.get("token").as_deref(), Some("abc"));

        storage.remove("token");
        assert_eq!(storage.get("token"), None);
    }

    #[test]
    fn corrupt_json_reads_as_none() {
        let storage = MemoryStorage::new();
        storage.set("user", "{not json");
        assert_eq!(load_json::<serde_json::Value>(&storage, "user"), None);
    }
}

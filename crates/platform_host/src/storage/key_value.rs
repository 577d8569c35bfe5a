//! Synchronous string key/value storage contracts and adapters.
//!
//! This is the capability behind `localStorage`-style persistence: every call completes before
//! returning, so callers can build read-modify-write sequences without suspension points.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Host service for string values stored per key.
pub trait KeyValueStore {
    /// Reads the raw value stored for `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key`. Removing a missing key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string. Clones share the same backing map.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryKeyValueStore::default();
        let store_obj: &dyn KeyValueStore = &store;

        store_obj.set_item("k", "v").expect("set");
        assert_eq!(store_obj.get_item("k").expect("get"), Some("v".to_string()));
        store_obj.remove_item("k").expect("remove");
        assert_eq!(store_obj.get_item("k").expect("get"), None);
        store_obj.remove_item("k").expect("remove missing");
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_backing_map() {
        let store = MemoryKeyValueStore::default();
        let shared = store.clone();
        store.set_item("notes", "[]").expect("set");
        assert_eq!(shared.get_item("notes").expect("get"), Some("[]".to_string()));
        assert_eq!(shared.len(), 1);
    }
}

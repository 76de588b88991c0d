use std::collections::HashMap;

use crate::persist::store::{check_name, ModelStore, StoreError};

/// An in-memory persistence backend.
///
/// Useful for hosts without durable storage, and as the test double.
pub struct MemoryModelStore<H> {
    entries: HashMap<String, H>,
}

impl<H> MemoryModelStore<H> {
    pub fn new() -> MemoryModelStore<H> {
        MemoryModelStore {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> Default for MemoryModelStore<H> {
    fn default() -> Self {
        MemoryModelStore::new()
    }
}

impl<H: Clone> ModelStore<H> for MemoryModelStore<H> {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn save(&mut self, name: &str, handle: &H) -> Result<(), StoreError> {
        check_name(name)?;
        self.entries.insert(name.to_owned(), handle.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<H, StoreError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        self.entries
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }
}

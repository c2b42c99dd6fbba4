//! In-process store with no persistence.

use std::sync::RwLock;

use super::{Repository, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    value: RwLock<T>,
}

impl<T> MemoryStore<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }
}

impl<T> Repository<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    fn load(&self) -> Result<T, StoreError> {
        self.value
            .read()
            .map(|v| v.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        let mut guard = self.value.write().map_err(|_| StoreError::Poisoned)?;
        *guard = value.clone();
        Ok(())
    }
}

//! In-memory implementation of Repository for testing and development

use crate::core::service::{Record, Repository};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory repository implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryRepository<T: Record> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> InMemoryRepository<T> {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(record.id(), record.clone());

        Ok(record)
    }

    async fn create_unless(
        &self,
        record: T,
        conflicts: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Option<T>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.values().any(conflicts) {
            return Ok(None);
        }
        records.insert(record.id(), record.clone());

        Ok(Some(record))
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().cloned().collect())
    }

    async fn update(&self, id: &Uuid, record: T) -> Result<Option<T>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match records.get_mut(id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(records.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.len())
    }
}

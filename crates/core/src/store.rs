//! Request/response seam to the external data service.
//!
//! Every entity the application persists is reached through the same five
//! calls. Failures carry a human-readable message and nothing else.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::{ContainerId, ContainerRecord};

/// Failure reported by the data service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A row the data service can store
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Clone + Ord + fmt::Display + Send + Sync + 'static;

    fn record_id(&self) -> Self::Id;
}

impl Record for ContainerRecord {
    type Id = ContainerId;

    fn record_id(&self) -> Self::Id {
        self.id
    }
}

/// Per-entity operations offered by the data service
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Fetch every record
    async fn list(&self) -> Result<Vec<R>, ServiceError>;

    /// Fetch one record by id
    async fn get(&self, id: &R::Id) -> Result<R, ServiceError>;

    /// Store a new record and return it as stored
    async fn insert(&self, record: R) -> Result<R, ServiceError>;

    /// Replace the record stored under `id`
    async fn update(&self, id: &R::Id, record: R) -> Result<R, ServiceError>;

    /// Delete the record stored under `id`
    async fn delete(&self, id: &R::Id) -> Result<(), ServiceError>;
}

/// Store that keeps records in memory, ordered by id
pub struct InMemoryStore<R: Record> {
    records: RwLock<BTreeMap<R::Id, R>>,
}

impl<R: Record> InMemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<R: Record> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &impl fmt::Display) -> ServiceError {
    ServiceError::new(format!("record {id} not found"))
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryStore<R> {
    async fn list(&self) -> Result<Vec<R>, ServiceError> {
        let records = self.records.read().await;
        trace!(count = records.len(), "listing records");
        Ok(records.values().cloned().collect())
    }

    async fn get(&self, id: &R::Id) -> Result<R, ServiceError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn insert(&self, record: R) -> Result<R, ServiceError> {
        let id = record.record_id();
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(ServiceError::new(format!("record {id} already exists")));
        }
        records.insert(id.clone(), record.clone());
        debug!(%id, "inserted record");
        Ok(record)
    }

    async fn update(&self, id: &R::Id, record: R) -> Result<R, ServiceError> {
        if record.record_id() != *id {
            return Err(ServiceError::new(format!(
                "record id {} does not match {id}",
                record.record_id()
            )));
        }
        let mut records = self.records.write().await;
        let slot = records.get_mut(id).ok_or_else(|| not_found(id))?;
        *slot = record.clone();
        debug!(%id, "updated record");
        Ok(record)
    }

    async fn delete(&self, id: &R::Id) -> Result<(), ServiceError> {
        match self.records.write().await.remove(id) {
            Some(_) => {
                debug!(%id, "deleted record");
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }
}

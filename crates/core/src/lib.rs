//! Content container hierarchy for WelcomeHub.
//!
//! A [`Container`] is a named, described holder of content metadata,
//! permissions and free-form attributes. Containers nest: a
//! [`ContainerRegistry`] owns every container of one hierarchy, indexes them
//! by id and keeps the parent/child links consistent and acyclic.
//!
//! Persistence is delegated to an external data service reached through the
//! [`RecordStore`] trait. Rows only carry `parent_id`; [`load_registry`]
//! rebuilds the tree from them.
//!
//! Neither `Container` nor `ContainerRegistry` synchronizes internally. Every
//! mutation takes `&mut self`, so a registry shared between threads or tasks
//! must sit behind a lock such as `tokio::sync::RwLock`.

use thiserror::Error;

pub mod container;
pub mod registry;
pub mod store;

pub use container::{Container, ContainerRecord, RelationalMetadata};
pub use registry::{load_registry, ContainerRegistry};
pub use store::{InMemoryStore, Record, RecordStore, ServiceError};
pub use welcomehub_types::{AttributeMap, ContainerId};

/// Errors that can occur while building or mutating a container hierarchy
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Invalid container: {0}")]
    Validation(String),

    #[error("Adding {child} under {parent} would make {child} its own ancestor")]
    Cycle {
        parent: ContainerId,
        child: ContainerId,
    },

    #[error("Container not found: {0}")]
    NotFound(ContainerId),

    #[error("Container id already registered: {0}")]
    DuplicateId(ContainerId),

    #[error("Hierarchy is inconsistent at container {0}")]
    CorruptHierarchy(ContainerId),

    #[error("Data service error: {0}")]
    Service(#[from] ServiceError),
}

impl From<validator::ValidationErrors> for ContainerError {
    fn from(err: validator::ValidationErrors) -> Self {
        ContainerError::Validation(err.to_string())
    }
}

/// Result type for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;

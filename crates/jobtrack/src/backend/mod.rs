//! Persistence backends for application records.
//!
//! The store talks to storage only through [`ApplicationBackend`]. Every
//! call carries the owner id; backends must treat records of other owners
//! as nonexistent.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::model::{Application, ApplicationDraft, ApplicationPatch};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// CRUD over the single applications table.
#[async_trait]
pub trait ApplicationBackend: Send + Sync {
    /// All applications of `owner_id`, newest `created_at` first.
    async fn fetch_all(&self, owner_id: &str) -> Result<Vec<Application>, BackendError>;

    /// Stores a new record, assigning its id and timestamps.
    async fn insert(
        &self,
        owner_id: &str,
        draft: ApplicationDraft,
    ) -> Result<Application, BackendError>;

    /// Applies `patch` and returns the stored record.
    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &ApplicationPatch,
    ) -> Result<Application, BackendError>;

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), BackendError>;
}

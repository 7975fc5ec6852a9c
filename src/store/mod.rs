//! The external record store seam.
//!
//! [`FormsApi`] is the contract repositories speak; the store behind it is a
//! collaborator, not part of this crate's domain. Two implementations ship:
//! [`MemoryFormsApi`] for tests and embedding, and [`RestFormsApi`] for a
//! hosted forms endpoint.

mod memory;
mod rest;

pub use memory::MemoryFormsApi;
pub use rest::RestFormsApi;

use crate::entry::{Entry, EntryId, FormId};
use crate::repository::{Paging, SearchCriteria, Sorting};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Operations the external record store exposes.
///
/// One round-trip per call; no caching, no retries, no concurrency
/// control beyond what the backend itself enforces.
#[async_trait]
pub trait FormsApi: Send + Sync {
    /// Create an entry; the record must carry its form id. Returns the new id.
    async fn add_entry(&self, entry: &Entry) -> Result<EntryId, StoreError>;

    /// Replace the stored record with `entry` (matched by the record's id).
    async fn update_entry(&self, entry: &Entry) -> Result<(), StoreError>;

    /// Delete an entry by id.
    async fn delete_entry(&self, entry_id: EntryId) -> Result<(), StoreError>;

    /// Query entries of one form: equality/range criteria, sort, paging.
    async fn get_entries(
        &self,
        form_id: FormId,
        criteria: &SearchCriteria,
        sorting: &Sorting,
        paging: &Paging,
    ) -> Result<Vec<Entry>, StoreError>;

    /// Count entries of one form matching the criteria.
    async fn count_entries(
        &self,
        form_id: FormId,
        criteria: &SearchCriteria,
    ) -> Result<u64, StoreError>;
}

//! Repository error taxonomy.

use crate::entry::EntryId;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by repository operations.
///
/// "No matches" is never an error: queries return `Ok(None)` or an empty
/// vector. [`RepositoryError::Backend`] means the store itself failed, so
/// callers can tell "not found" from "backend unavailable".
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    #[error("Backend unavailable: {0}")]
    Backend(#[source] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RepositoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        RepositoryError::Validation(msg.into())
    }
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RepositoryError::NotFound(id),
            StoreError::InvalidEntry(msg) => RepositoryError::Validation(msg),
            other => RepositoryError::Backend(other),
        }
    }
}

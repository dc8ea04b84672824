use thiserror::Error;

/// Failures reported by a graph store or view-definition backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Store call cancelled")]
    Cancelled,
    #[error("Store returned unusable data: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Worth retrying for idempotent reads.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

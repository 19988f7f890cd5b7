//! # Store Errors
//!
//! Errors raised by the collection engine itself. Document-level failures are
//! carried through [`StoreError::Document`] so callers can downcast them.

/// Errors that can occur while talking to a document collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Collection closed")]
    ChannelClosed,
    #[error("Collection dropped response channel")]
    ResponseDropped,
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Document already exists: {0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Document(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap a document error.
    pub fn document(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Document(Box::new(e))
    }

    /// True when the failure means the referenced document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

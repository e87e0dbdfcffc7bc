//! Error types for the storage engine.

use thiserror::Error;
use crate::types::{PageId, RecordId};

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur in the storage engine
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error from the underlying file system
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An unqualified field name matched more than one field
    #[error("Field name {0} is ambiguous")]
    AmbiguousName(String),

    /// No field in the descriptor matched the request
    #[error("Field {0} not found")]
    FieldNotFound(String),

    /// Values or expression results of incompatible types
    #[error("Incompatible types: {0}")]
    IncompatibleTypes(String),

    /// Page has no empty slot left
    #[error("Page {page_id} is full ({capacity} slots)")]
    PageFull { page_id: PageId, capacity: usize },

    /// Slot index outside the page, or a locator for another page
    #[error("Invalid slot for record {0}")]
    InvalidSlot(RecordId),

    /// The addressed slot holds no tuple
    #[error("No tuple at record {0}")]
    TupleNotFound(RecordId),

    /// Input ended before the descriptor was satisfied
    #[error("Truncated input: need {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// String value exceeds the fixed string width
    #[error("Value too large: {size} bytes (max: {max})")]
    ValueTooLarge { size: usize, max: usize },

    /// Requested page was not found
    #[error("Page {0} not found")]
    PageNotFound(PageId),

    /// Data corruption detected (e.g., checksum mismatch)
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Invalid operation for the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Database file is corrupted or has invalid format
    #[error("Invalid database file: {0}")]
    InvalidDatabaseFile(String),
}

impl StorageError {
    /// Create a corruption error with a message
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }

    /// Create an incompatible types error
    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::IncompatibleTypes(msg.into())
    }

    /// Create an invalid operation error
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Create an invalid database file error
    pub fn invalid_db(msg: impl Into<String>) -> Self {
        Self::InvalidDatabaseFile(msg.into())
    }
}

//! Common types used throughout the storage engine.

mod page_id;
mod record_id;

pub use page_id::PageId;
pub use record_id::RecordId;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size in bytes (4KB)
pub const PAGE_SIZE: usize = 4096;

/// Fixed on-disk width of every string field.
///
/// Strings shorter than this are zero-padded on the right.
pub const STRING_LENGTH: usize = 32;

/// On-disk width of an integer field
pub const INT_SIZE: usize = std::mem::size_of::<i64>();

/// Heap page header: slot capacity and used slots, two `i32`s
pub const PAGE_HEADER_SIZE: usize = 8;

/// Type of a tuple field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// 64-bit signed integer
    Int,
    /// Fixed-width string of at most `STRING_LENGTH` bytes
    String,
    /// Not yet known; only appears while resolving names
    Unknown,
}

impl DbType {
    /// On-disk width of a value of this type, or `None` for `Unknown`
    pub const fn width(self) -> Option<usize> {
        match self {
            Self::Int => Some(INT_SIZE),
            Self::String => Some(STRING_LENGTH),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::String => write!(f, "string"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Opaque transaction handle.
///
/// Pages only record it when marked dirty; the transaction manager gives it meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Create a new transaction ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn#{}", self.0)
    }
}

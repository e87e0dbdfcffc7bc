//! # Record Storage
//!
//! The record layer of a relational storage engine: how rows are typed,
//! compared and serialized, and how fixed-size pages hold them.
//!
//! ## Architecture
//!
//! - **Schema** (`schema`): field descriptors that fix a tuple's byte layout
//! - **Tuples** (`tuple`): row values, the fixed-width codec, projection,
//!   ordering, joins and content keys
//! - **Page Layer** (`page`): heap pages with a fixed array of tuple slots
//! - **Storage Layer** (`storage`): page I/O and the heap file owning pages
//!
//! ## Usage
//!
//! ```rust,ignore
//! use record_storage::{Config, DbType, DbValue, FieldType, HeapFile, Tuple, TupleDesc};
//!
//! let desc = TupleDesc::new(vec![
//!     FieldType::new("id", "t", DbType::Int),
//!     FieldType::new("name", "t", DbType::String),
//! ]);
//! let file = HeapFile::open(&Config::new("people.dat"), desc.clone())?;
//!
//! let page = file.new_page()?;
//! let mut tuple = Tuple::new(desc, vec![DbValue::Int(7), DbValue::from("mit")])?;
//! let rid = page.insert(&mut tuple)?;
//! file.flush_page(&page)?;
//!
//! for tuple in file.read_page(rid.page_id)?.iter() {
//!     println!("{}", tuple.pretty_string(false));
//! }
//! ```

pub mod error;
pub mod page;
pub mod schema;
pub mod storage;
pub mod tuple;
pub mod types;

pub use error::{Result, StorageError};
pub use page::{HeapPage, HeapPageIter, PageBuf};
pub use schema::{FieldType, TupleDesc};
pub use storage::{DiskManager, DiskManagerImpl, HeapFile, MemoryDiskManager};
pub use tuple::{BoolOp, ConstExpr, DbValue, Expr, FieldExpr, Tuple, TupleKey};
pub use types::{
    DbType, PageId, RecordId, TransactionId, PAGE_HEADER_SIZE, PAGE_SIZE, STRING_LENGTH,
};

use std::path::PathBuf;

/// Storage file configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the storage file
    pub path: PathBuf,
    /// Whether to sync writes immediately (default: false for performance)
    pub sync_on_write: bool,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            sync_on_write: false,
        }
    }

    /// Enable sync on write for durability
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.sync_on_write = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_heap_file_from_config() -> Result<()> {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().join("people.dat")).sync_on_write(true);
        assert!(config.sync_on_write);

        let desc = TupleDesc::new(vec![FieldType::new("id", "t", DbType::Int)]);
        let file = HeapFile::open(&config, desc.clone())?;
        let page = file.new_page()?;
        page.insert(&mut Tuple::new(desc, vec![DbValue::Int(1)])?)?;
        file.flush_page(&page)?;

        assert_eq!(file.num_pages(), 1);
        Ok(())
    }
}

//! Storage layer: whole-page disk I/O and the heap file that owns pages.
//!
//! The record layer never touches files directly. A [`DiskManager`] reads
//! and writes `PAGE_SIZE` buffers by page number, and a [`HeapFile`] turns
//! those buffers into [`HeapPage`](crate::page::HeapPage)s of one descriptor.

mod disk_manager;
mod file_header;
mod heap_file;
mod memory;

pub use disk_manager::{DiskManager, DiskManagerImpl};
pub use file_header::FileHeader;
pub use heap_file::HeapFile;
pub use memory::MemoryDiskManager;

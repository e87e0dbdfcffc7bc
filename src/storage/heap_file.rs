//! Heap file: a storage file whose data pages all hold tuples of one descriptor.

use crate::error::{Result, StorageError};
use crate::page::HeapPage;
use crate::schema::TupleDesc;
use crate::storage::{DiskManager, DiskManagerImpl};
use crate::types::PageId;
use crate::Config;
use std::sync::Arc;
use tracing::debug;

/// Owner of the pages of one table.
///
/// Pages keep a weak back-reference to their file, so a file is always
/// handled through an `Arc`. Choosing which page receives an insert, and
/// retrying on `PageFull`, is left to the layer above.
pub struct HeapFile {
    desc: TupleDesc,
    disk: Arc<dyn DiskManager>,
}

impl HeapFile {
    /// Create a heap file over an existing disk manager
    pub fn new(desc: TupleDesc, disk: Arc<dyn DiskManager>) -> Result<Arc<Self>> {
        desc.bytes_per_tuple()?;
        Ok(Arc::new(Self { desc, disk }))
    }

    /// Open or create the file named by `config`
    pub fn open(config: &Config, desc: TupleDesc) -> Result<Arc<Self>> {
        let disk = Arc::new(DiskManagerImpl::open(&config.path, config.sync_on_write)?);
        Self::new(desc, disk)
    }

    pub fn desc(&self) -> &TupleDesc {
        &self.desc
    }

    /// Number of data pages (the header page is not counted)
    pub fn num_pages(&self) -> usize {
        self.disk.page_count().saturating_sub(1) as usize
    }

    /// IDs of all data pages in file order
    pub fn page_ids(&self) -> impl Iterator<Item = PageId> {
        (1..self.disk.page_count()).map(PageId::new)
    }

    /// Allocate a page on disk and return it empty and clean
    pub fn new_page(self: &Arc<Self>) -> Result<HeapPage> {
        let page_id = self.disk.allocate_page()?;
        HeapPage::new(&self.desc, page_id, Arc::downgrade(self))
    }

    /// Read and decode a page
    pub fn read_page(self: &Arc<Self>, page_id: PageId) -> Result<HeapPage> {
        let buf = self.disk.read_page(page_id)?;
        HeapPage::from_bytes(&self.desc, page_id, Arc::downgrade(self), &buf)
    }

    /// Write `page` to disk and mark it clean
    pub fn flush_page(&self, page: &HeapPage) -> Result<()> {
        let owned = page
            .file()
            .is_some_and(|file| std::ptr::eq(Arc::as_ptr(&file), self));
        if !owned {
            return Err(StorageError::invalid_operation(format!(
                "page {} does not belong to this file",
                page.page_id()
            )));
        }

        let buf = page.to_bytes()?;
        self.disk.write_page(page.page_id(), &buf)?;
        page.set_dirty(None, false);

        debug!(page = %page.page_id(), "flushed page");
        Ok(())
    }

    /// Sync the underlying storage
    pub fn sync(&self) -> Result<()> {
        self.disk.sync()
    }
}

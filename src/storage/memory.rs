//! In-memory disk manager.

use crate::error::{Result, StorageError};
use crate::page::PageBuf;
use crate::storage::DiskManager;
use crate::types::{PageId, PAGE_SIZE};
use parking_lot::RwLock;

/// Keeps every page in memory; nothing survives the process.
///
/// Index 0 stands in for the header page so page numbers match a real file.
pub struct MemoryDiskManager {
    pages: RwLock<Vec<PageBuf>>,
}

impl MemoryDiskManager {
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(vec![PageBuf::new()]),
        }
    }
}

impl Default for MemoryDiskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskManager for MemoryDiskManager {
    fn read_page(&self, page_id: PageId) -> Result<PageBuf> {
        if page_id == PageId::HEADER {
            return Err(StorageError::invalid_operation(
                "cannot access header page directly",
            ));
        }
        self.pages
            .read()
            .get(page_id.value() as usize)
            .cloned()
            .ok_or(StorageError::PageNotFound(page_id))
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        if data.len() != PAGE_SIZE {
            return Err(StorageError::invalid_operation(format!(
                "page data must be {} bytes, got {}",
                PAGE_SIZE,
                data.len()
            )));
        }
        if page_id == PageId::HEADER {
            return Err(StorageError::invalid_operation(
                "cannot access header page directly",
            ));
        }

        let mut pages = self.pages.write();
        let page = pages
            .get_mut(page_id.value() as usize)
            .ok_or(StorageError::PageNotFound(page_id))?;
        page.copy_from_slice(data);
        Ok(())
    }

    fn allocate_page(&self) -> Result<PageId> {
        let mut pages = self.pages.write();
        pages.push(PageBuf::new());
        Ok(PageId::new((pages.len() - 1) as u32))
    }

    fn page_count(&self) -> u32 {
        self.pages.read().len() as u32
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pages() -> Result<()> {
        let dm = MemoryDiskManager::new();
        assert_eq!(dm.page_count(), 1);

        let page_id = dm.allocate_page()?;
        assert_eq!(page_id, PageId::new(1));

        let mut data = vec![0u8; PAGE_SIZE];
        data[..3].copy_from_slice(b"abc");
        dm.write_page(page_id, &data)?;
        assert_eq!(&dm.read_page(page_id)?[..3], b"abc");

        assert!(matches!(
            dm.read_page(PageId::new(5)),
            Err(StorageError::PageNotFound(_))
        ));
        assert!(dm.write_page(PageId::HEADER, &data).is_err());

        Ok(())
    }
}

//! Disk manager implementation.
//!
//! The disk manager reads and writes whole pages of the storage file by
//! page number. It sits behind a trait so that pages and heap files can be
//! tested against [`MemoryDiskManager`](super::MemoryDiskManager).

use crate::error::{Result, StorageError};
use crate::page::PageBuf;
use crate::storage::FileHeader;
use crate::types::{PageId, PAGE_SIZE};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// Whole-page I/O by page number.
///
/// Page 0 is reserved for the file header; data pages start at 1.
pub trait DiskManager: Send + Sync {
    /// Read a page from disk
    fn read_page(&self, page_id: PageId) -> Result<PageBuf>;

    /// Write a full page to disk
    fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()>;

    /// Append a zeroed page and return its ID
    fn allocate_page(&self) -> Result<PageId>;

    /// Total pages in the file, including the header page
    fn page_count(&self) -> u32;

    /// Sync all data to disk
    fn sync(&self) -> Result<()>;
}

/// File-based disk manager implementation
pub struct DiskManagerImpl {
    file: RwLock<File>,
    header: RwLock<FileHeader>,
    sync_on_write: bool,
}

impl DiskManagerImpl {
    /// Open or create a storage file
    pub fn open(path: &Path, sync_on_write: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len();
        let header = if len >= PAGE_SIZE as u64 {
            let mut file_ref = &file;
            let mut buf = vec![0u8; PAGE_SIZE];
            file_ref.read_exact(&mut buf)?;
            FileHeader::read(&buf)?
        } else if len > 0 {
            return Err(StorageError::invalid_db(format!(
                "file is {} bytes, shorter than its header page",
                len
            )));
        } else {
            let header = FileHeader::new();
            let mut buf = vec![0u8; PAGE_SIZE];
            header.write(&mut buf);

            let mut file_ref = &file;
            file_ref.seek(SeekFrom::Start(0))?;
            file_ref.write_all(&buf)?;
            file_ref.sync_all()?;

            header
        };

        debug!(path = %path.display(), pages = header.page_count, "opened storage file");

        Ok(Self {
            file: RwLock::new(file),
            header: RwLock::new(header),
            sync_on_write,
        })
    }

    fn flush_header(&self) -> Result<()> {
        let header = self.header.read();
        self.write_header(&header)
    }

    /// Write `header` to page 0. Callers hold the header lock.
    fn write_header(&self, header: &FileHeader) -> Result<()> {
        let mut buf = vec![0u8; PAGE_SIZE];
        header.write(&mut buf);

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&buf)?;

        if self.sync_on_write {
            file.sync_data()?;
        }

        Ok(())
    }

    fn check_data_page(&self, page_id: PageId) -> Result<()> {
        if page_id == PageId::HEADER {
            return Err(StorageError::invalid_operation(
                "cannot access header page directly",
            ));
        }
        if page_id.value() >= self.header.read().page_count {
            return Err(StorageError::PageNotFound(page_id));
        }
        Ok(())
    }
}

impl DiskManager for DiskManagerImpl {
    fn read_page(&self, page_id: PageId) -> Result<PageBuf> {
        self.check_data_page(page_id)?;

        let mut buf = PageBuf::new();
        let mut file = self.file.write();
        file.seek(SeekFrom::Start(page_id.file_offset(PAGE_SIZE)))?;
        file.read_exact(&mut buf)?;

        Ok(buf)
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        self.check_data_page(page_id)?;

        if data.len() != PAGE_SIZE {
            return Err(StorageError::invalid_operation(format!(
                "page data must be {} bytes, got {}",
                PAGE_SIZE,
                data.len()
            )));
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(page_id.file_offset(PAGE_SIZE)))?;
        file.write_all(data)?;

        if self.sync_on_write {
            file.sync_data()?;
        }

        Ok(())
    }

    fn allocate_page(&self) -> Result<PageId> {
        // The cached count only moves once the page and header are on disk
        let mut header = self.header.write();
        let page_id = PageId::new(header.page_count);

        {
            let mut file = self.file.write();
            file.seek(SeekFrom::Start(page_id.file_offset(PAGE_SIZE)))?;
            file.write_all(&[0u8; PAGE_SIZE])?;
        }

        let grown = FileHeader {
            page_count: header.page_count + 1,
            ..*header
        };
        self.write_header(&grown)?;
        *header = grown;

        debug!(page = %page_id, "allocated page");
        Ok(page_id)
    }

    fn page_count(&self) -> u32 {
        self.header.read().page_count
    }

    fn sync(&self) -> Result<()> {
        self.flush_header()?;
        self.file.write().sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_new_file() -> Result<()> {
        let dir = tempdir().unwrap();
        let dm = DiskManagerImpl::open(&dir.path().join("test.db"), false)?;

        assert_eq!(dm.page_count(), 1);
        assert!(matches!(
            dm.read_page(PageId::new(1)),
            Err(StorageError::PageNotFound(_))
        ));
        assert!(dm.read_page(PageId::HEADER).is_err());

        Ok(())
    }

    #[test]
    fn test_allocate_and_write_page() -> Result<()> {
        let dir = tempdir().unwrap();
        let dm = DiskManagerImpl::open(&dir.path().join("test.db"), false)?;

        let page_id = dm.allocate_page()?;
        assert_eq!(page_id, PageId::new(1));
        assert!(dm.read_page(page_id)?.iter().all(|&b| b == 0));

        let mut data = vec![0u8; PAGE_SIZE];
        data[0..5].copy_from_slice(b"hello");
        dm.write_page(page_id, &data)?;
        assert_eq!(&dm.read_page(page_id)?[0..5], b"hello");

        assert!(dm.write_page(page_id, b"short").is_err());

        Ok(())
    }

    #[test]
    fn test_page_count_matches_file_length() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let dm = DiskManagerImpl::open(&path, false)?;

        for expected in 1..=3 {
            assert_eq!(dm.allocate_page()?, PageId::new(expected));
            let len = std::fs::metadata(&path)?.len();
            assert_eq!(len, dm.page_count() as u64 * PAGE_SIZE as u64);
        }

        Ok(())
    }

    #[test]
    fn test_short_file_is_rejected() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        std::fs::write(&path, b"not a storage file")?;

        assert!(matches!(
            DiskManagerImpl::open(&path, false),
            Err(StorageError::InvalidDatabaseFile(_))
        ));
        assert_eq!(std::fs::read(&path)?, b"not a storage file");

        Ok(())
    }

    #[test]
    fn test_reopen_file() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let dm = DiskManagerImpl::open(&path, true)?;
            let page_id = dm.allocate_page()?;
            let mut data = vec![0u8; PAGE_SIZE];
            data[0..4].copy_from_slice(b"test");
            dm.write_page(page_id, &data)?;
            dm.sync()?;
        }

        let dm = DiskManagerImpl::open(&path, false)?;
        assert_eq!(dm.page_count(), 2);
        assert_eq!(&dm.read_page(PageId::new(1))?[0..4], b"test");

        Ok(())
    }
}

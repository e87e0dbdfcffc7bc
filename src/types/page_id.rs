//! Page number type.

use std::fmt;

/// Page number within a storage file.
///
/// Page 0 holds the file header; heap pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PageId(pub u32);

impl PageId {
    /// The file header page
    pub const HEADER: PageId = PageId(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Byte offset of this page in a file of `page_size` pages
    pub const fn file_offset(self, page_size: usize) -> u64 {
        self.0 as u64 * page_size as u64
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PAGE_SIZE;

    #[test]
    fn test_header_page_precedes_data_pages() {
        assert_eq!(PageId::HEADER.file_offset(PAGE_SIZE), 0);
        assert_eq!(PageId::new(3).file_offset(PAGE_SIZE), 3 * PAGE_SIZE as u64);
        assert_eq!(PageId::new(7).value(), 7);
        assert_eq!(PageId::new(42).to_string(), "42");
    }
}

//! Page layer: fixed-slot heap pages.
//!
//! Every tuple of a descriptor has the same width, so a page is a small
//! header followed by an array of equal-sized slots:
//! ```text
//! offset 0   i32 LE  slot capacity
//! offset 4   i32 LE  used slots
//! offset 8   used tuples, packed in ascending slot order
//! rest       zero padding up to PAGE_SIZE
//! ```

mod header;
mod heap_page;

pub use header::HeapPageHeader;
pub use heap_page::{HeapPage, HeapPageIter};

use crate::types::PAGE_SIZE;

/// A heap-allocated buffer of exactly `PAGE_SIZE` bytes
#[derive(Clone, PartialEq, Eq)]
pub struct PageBuf {
    data: Box<[u8]>,
}

impl PageBuf {
    /// Create a zeroed page buffer
    pub fn new() -> Self {
        Self {
            data: vec![0u8; PAGE_SIZE].into_boxed_slice(),
        }
    }

    /// Copy `bytes` into a new buffer, truncating or zero-padding to `PAGE_SIZE`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = Self::new();
        let len = bytes.len().min(PAGE_SIZE);
        buf.data[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for PageBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PageBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        f.debug_struct("PageBuf").field("used_bytes", &used).finish()
    }
}

impl std::ops::Deref for PageBuf {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl std::ops::DerefMut for PageBuf {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl AsRef<[u8]> for PageBuf {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_pads_and_truncates() {
        let short = PageBuf::from_bytes(b"abc");
        assert_eq!(short.len(), PAGE_SIZE);
        assert_eq!(&short[..3], b"abc");
        assert!(short[3..].iter().all(|&b| b == 0));

        let long = PageBuf::from_bytes(&vec![7u8; PAGE_SIZE + 10]);
        assert_eq!(long.len(), PAGE_SIZE);
    }
}

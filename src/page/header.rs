//! Heap page header.

use crate::error::{Result, StorageError};
use crate::types::PAGE_HEADER_SIZE;

/// Slot capacity and occupancy stored at the start of every heap page.
///
/// Layout (8 bytes):
/// ```text
/// Offset  Size  Description
/// 0       4     Total slots on the page (i32, little-endian)
/// 4       4     Used slots (i32, little-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapPageHeader {
    pub total_slots: i32,
    pub used_slots: i32,
}

impl HeapPageHeader {
    /// Read a header from the start of `bytes`
    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PAGE_HEADER_SIZE {
            return Err(StorageError::Truncated {
                needed: PAGE_HEADER_SIZE,
                available: bytes.len(),
            });
        }

        Ok(Self {
            total_slots: i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            used_slots: i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }

    /// Append the encoded header to `buf`
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.total_slots.to_le_bytes());
        buf.extend_from_slice(&self.used_slots.to_le_bytes());
    }

    /// All-zero header of a page that was allocated but never written
    pub fn is_blank(&self) -> bool {
        self.total_slots == 0 && self.used_slots == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = HeapPageHeader {
            total_slots: 102,
            used_slots: 3,
        };
        let mut bytes = Vec::new();
        header.write(&mut bytes);

        assert_eq!(bytes, [102, 0, 0, 0, 3, 0, 0, 0]);
        assert_eq!(HeapPageHeader::read(&bytes).unwrap(), header);
    }

    #[test]
    fn test_header_short_input() {
        assert!(matches!(
            HeapPageHeader::read(&[1, 2, 3]),
            Err(StorageError::Truncated { needed: 8, available: 3 })
        ));
    }
}

//! Storage file header.
//!
//! Page 0 of every storage file records the layout constants the file was
//! written with, so a build with a different page size or string width
//! refuses to open it.

use crate::error::{Result, StorageError};
use crate::types::{PAGE_SIZE, STRING_LENGTH};

/// Magic bytes to identify a valid storage file
pub const MAGIC: &[u8; 16] = b"RecordStoreV01\0\0";

/// Encoded header size; the rest of page 0 is zero
const ENCODED_SIZE: usize = 32;

/// Storage file header
///
/// Layout (little-endian):
/// ```text
/// Offset  Size  Description
/// 0       16    Magic string "RecordStoreV01\0\0"
/// 16      4     Page size
/// 20      4     String field width
/// 24      4     Total page count, including this one
/// 28      4     Checksum of bytes 0..28 (CRC32)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub page_size: u32,
    pub string_length: u32,
    pub page_count: u32,
}

impl FileHeader {
    /// Header for an empty file with the current layout constants
    pub fn new() -> Self {
        Self {
            page_size: PAGE_SIZE as u32,
            string_length: STRING_LENGTH as u32,
            page_count: 1,
        }
    }

    /// Read and validate a header from bytes
    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENCODED_SIZE {
            return Err(StorageError::invalid_db("header too short"));
        }

        if &bytes[0..16] != MAGIC {
            return Err(StorageError::invalid_db("invalid magic bytes"));
        }

        let field = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        if field(28) != crc32fast::hash(&bytes[0..28]) {
            return Err(StorageError::corruption("header checksum mismatch"));
        }

        let header = Self {
            page_size: field(16),
            string_length: field(20),
            page_count: field(24),
        };

        if header.page_size != PAGE_SIZE as u32 {
            return Err(StorageError::invalid_db(format!(
                "unsupported page size: {} (expected {})",
                header.page_size, PAGE_SIZE
            )));
        }
        if header.string_length != STRING_LENGTH as u32 {
            return Err(StorageError::invalid_db(format!(
                "unsupported string length: {} (expected {})",
                header.string_length, STRING_LENGTH
            )));
        }

        Ok(header)
    }

    /// Write this header over the start of `bytes`, which must hold a full page
    pub fn write(&self, bytes: &mut [u8]) {
        bytes[..PAGE_SIZE].fill(0);
        bytes[0..16].copy_from_slice(MAGIC);
        bytes[16..20].copy_from_slice(&self.page_size.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.string_length.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.page_count.to_le_bytes());

        let checksum = crc32fast::hash(&bytes[0..28]);
        bytes[28..32].copy_from_slice(&checksum.to_le_bytes());
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = FileHeader {
            page_count: 17,
            ..FileHeader::new()
        };
        let mut bytes = vec![0u8; PAGE_SIZE];
        header.write(&mut bytes);

        assert_eq!(FileHeader::read(&bytes).unwrap(), header);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = vec![0u8; PAGE_SIZE];
        bytes[0..16].copy_from_slice(b"InvalidMagic0000");
        assert!(matches!(
            FileHeader::read(&bytes),
            Err(StorageError::InvalidDatabaseFile(_))
        ));
    }

    #[test]
    fn test_checksum_validation() {
        let mut bytes = vec![0u8; PAGE_SIZE];
        FileHeader::new().write(&mut bytes);
        bytes[24] ^= 0xFF;
        assert!(matches!(FileHeader::read(&bytes), Err(StorageError::Corruption(_))));
    }

    #[test]
    fn test_rejects_other_string_length() {
        let header = FileHeader {
            string_length: STRING_LENGTH as u32 * 2,
            ..FileHeader::new()
        };
        let mut bytes = vec![0u8; PAGE_SIZE];
        header.write(&mut bytes);
        assert!(matches!(
            FileHeader::read(&bytes),
            Err(StorageError::InvalidDatabaseFile(_))
        ));
    }
}

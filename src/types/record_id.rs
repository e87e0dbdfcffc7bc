//! Record locator type.

use super::PageId;
use std::fmt;

/// Address of a stored tuple: the page it lives on and its slot within that page.
///
/// Only meaningful relative to the file that issued it. A locator goes stale
/// once its tuple is deleted or its page is reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    /// Page holding the tuple
    pub page_id: PageId,
    /// Slot index within the page
    pub slot: usize,
}

impl RecordId {
    /// Create a new record ID
    pub const fn new(page_id: PageId, slot: usize) -> Self {
        Self { page_id, slot }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_id, self.slot)
    }
}

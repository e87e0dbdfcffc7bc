//! Fixed-slot heap page.
//!
//! A page holds `capacity` slots, each empty or holding one tuple. Inserts
//! take the lowest empty slot and stamp the tuple with its record ID.
//! Serialization packs occupied slots in ascending order, so reloading a
//! page renumbers its tuples `0..used`; record IDs issued before a reload
//! must not be reused.

use crate::error::{Result, StorageError};
use crate::page::{HeapPageHeader, PageBuf};
use crate::schema::TupleDesc;
use crate::storage::HeapFile;
use crate::tuple::Tuple;
use crate::types::{PageId, RecordId, TransactionId, PAGE_HEADER_SIZE, PAGE_SIZE};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Mutable part of a page, guarded by the page lock
#[derive(Debug)]
struct PageState {
    slots: Vec<Option<Tuple>>,
    used: usize,
    dirty: bool,
    dirtied_by: Option<TransactionId>,
}

impl PageState {
    fn empty(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            used: 0,
            dirty: false,
            dirtied_by: None,
        }
    }
}

/// A slotted page of fixed-width tuples.
///
/// All operations take `&self` and serialize on an internal lock, so a page
/// can be shared between threads behind an `Arc`.
#[derive(Debug)]
pub struct HeapPage {
    desc: TupleDesc,
    page_id: PageId,
    capacity: usize,
    bytes_per_tuple: usize,
    file: Weak<HeapFile>,
    state: Mutex<PageState>,
}

impl HeapPage {
    /// Create an empty, clean page for tuples of `desc`.
    ///
    /// Capacity is `(PAGE_SIZE - 8) / desc.bytes_per_tuple()`; descriptors
    /// too wide for a single slot are rejected.
    pub fn new(desc: &TupleDesc, page_id: PageId, file: Weak<HeapFile>) -> Result<Self> {
        let bytes_per_tuple = desc.bytes_per_tuple()?;
        if bytes_per_tuple == 0 {
            return Err(StorageError::invalid_operation(
                "cannot store tuples with no fields",
            ));
        }

        let capacity = (PAGE_SIZE - PAGE_HEADER_SIZE) / bytes_per_tuple;
        if capacity == 0 {
            return Err(StorageError::invalid_operation(format!(
                "tuples of {} bytes do not fit in a page",
                bytes_per_tuple
            )));
        }

        Ok(Self {
            desc: desc.clone(),
            page_id,
            capacity,
            bytes_per_tuple,
            file,
            state: Mutex::new(PageState::empty(capacity)),
        })
    }

    /// Build a page from its serialized form. The page starts clean.
    pub fn from_bytes(
        desc: &TupleDesc,
        page_id: PageId,
        file: Weak<HeapFile>,
        bytes: &[u8],
    ) -> Result<Self> {
        let page = Self::new(desc, page_id, file)?;
        page.load(bytes)?;
        Ok(page)
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn desc(&self) -> &TupleDesc {
        &self.desc
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots holding a tuple
    pub fn used_slot_count(&self) -> usize {
        self.state.lock().used
    }

    /// Number of free slots
    pub fn empty_slot_count(&self) -> usize {
        self.capacity - self.state.lock().used
    }

    /// The file this page belongs to, if it is still open
    pub fn file(&self) -> Option<Arc<HeapFile>> {
        self.file.upgrade()
    }

    /// Place `tuple` in the lowest empty slot and set its record ID.
    ///
    /// On `PageFull` or a layout mismatch the tuple is left untouched.
    pub fn insert(&self, tuple: &mut Tuple) -> Result<RecordId> {
        self.check_layout(tuple.desc())?;

        let mut state = self.state.lock();
        let slot = state
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(StorageError::PageFull {
                page_id: self.page_id,
                capacity: self.capacity,
            })?;

        let rid = RecordId::new(self.page_id, slot);
        tuple.set_rid(Some(rid));
        state.slots[slot] = Some(tuple.clone());
        state.used += 1;
        state.dirty = true;

        trace!(page = %self.page_id, slot, "inserted tuple");
        Ok(rid)
    }

    /// Remove the tuple at `rid`.
    ///
    /// Fails with `InvalidSlot` if `rid` is for another page or past the
    /// last slot, and with `TupleNotFound` if the slot is already empty.
    pub fn delete(&self, rid: RecordId) -> Result<Tuple> {
        if rid.page_id != self.page_id || rid.slot >= self.capacity {
            return Err(StorageError::InvalidSlot(rid));
        }

        let mut state = self.state.lock();
        let tuple = state.slots[rid.slot]
            .take()
            .ok_or(StorageError::TupleNotFound(rid))?;
        state.used -= 1;
        state.dirty = true;

        trace!(page = %self.page_id, slot = rid.slot, "deleted tuple");
        Ok(tuple)
    }

    /// Encode the page into a `PAGE_SIZE` buffer: header, then occupied
    /// tuples in slot order, then zeros.
    ///
    /// Serializing does not clear the dirty flag.
    pub fn to_bytes(&self) -> Result<PageBuf> {
        let state = self.state.lock();

        let mut buf = Vec::with_capacity(PAGE_SIZE);
        HeapPageHeader {
            total_slots: slot_count_i32(self.capacity)?,
            used_slots: slot_count_i32(state.used)?,
        }
        .write(&mut buf);

        for tuple in state.slots.iter().flatten() {
            tuple.write_to(&mut buf)?;
        }

        debug!(page = %self.page_id, used = state.used, bytes = buf.len(), "serialized page");
        Ok(PageBuf::from_bytes(&buf))
    }

    /// Replace the page contents with the serialized page in `bytes`.
    ///
    /// Tuples land in slots `0..used` in the order read and the page becomes
    /// clean. An all-zero header loads as an empty page. On error the page
    /// is left as it was.
    pub fn load(&self, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock();

        let header = HeapPageHeader::read(bytes)?;
        if !header.is_blank() && header.total_slots as i64 != self.capacity as i64 {
            return Err(StorageError::corruption(format!(
                "page {} has {} slots but descriptor allows {}",
                self.page_id, header.total_slots, self.capacity
            )));
        }
        let used = usize::try_from(header.used_slots)
            .ok()
            .filter(|&used| used <= self.capacity)
            .ok_or_else(|| {
                StorageError::corruption(format!(
                    "page {} claims {} used slots",
                    self.page_id, header.used_slots
                ))
            })?;

        let mut slots: Vec<Option<Tuple>> = Vec::with_capacity(self.capacity);
        for slot in 0..used {
            let offset = PAGE_HEADER_SIZE + slot * self.bytes_per_tuple;
            let mut tuple = Tuple::read_from(bytes.get(offset..).unwrap_or_default(), &self.desc)?;
            tuple.set_rid(Some(RecordId::new(self.page_id, slot)));
            slots.push(Some(tuple));
        }
        slots.resize(self.capacity, None);

        *state = PageState {
            slots,
            used,
            dirty: false,
            dirtied_by: None,
        };

        debug!(page = %self.page_id, used, "loaded page");
        Ok(())
    }

    /// Iterate over stored tuples in slot order.
    ///
    /// Each call starts a fresh scan. The iterator locks the page per step,
    /// so it sees concurrent changes to slots it has not reached yet.
    pub fn iter(&self) -> HeapPageIter<'_> {
        HeapPageIter {
            page: self,
            next_slot: 0,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Set the dirty flag, recording `tid` as the writer when marking dirty.
    ///
    /// Only the buffer pool should clear the flag, after a successful flush.
    pub fn set_dirty(&self, tid: Option<TransactionId>, dirty: bool) {
        let mut state = self.state.lock();
        state.dirty = dirty;
        state.dirtied_by = if dirty { tid } else { None };
    }

    /// Transaction last recorded by `set_dirty`
    pub fn dirtied_by(&self) -> Option<TransactionId> {
        self.state.lock().dirtied_by
    }

    fn check_layout(&self, desc: &TupleDesc) -> Result<()> {
        let same_layout = desc.len() == self.desc.len()
            && desc
                .fields()
                .iter()
                .zip(self.desc.fields())
                .all(|(a, b)| a.ftype == b.ftype);
        if !same_layout {
            return Err(StorageError::incompatible(format!(
                "tuple layout does not match page {}",
                self.page_id
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HeapPage {
    type Item = Tuple;
    type IntoIter = HeapPageIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over the occupied slots of a [`HeapPage`]
pub struct HeapPageIter<'a> {
    page: &'a HeapPage,
    next_slot: usize,
}

impl Iterator for HeapPageIter<'_> {
    type Item = Tuple;

    fn next(&mut self) -> Option<Tuple> {
        let state = self.page.state.lock();
        while self.next_slot < state.slots.len() {
            let slot = self.next_slot;
            self.next_slot += 1;
            if let Some(tuple) = &state.slots[slot] {
                return Some(tuple.clone());
            }
        }
        None
    }
}

fn slot_count_i32(count: usize) -> Result<i32> {
    i32::try_from(count).map_err(|_| StorageError::corruption("slot count overflows header"))
}

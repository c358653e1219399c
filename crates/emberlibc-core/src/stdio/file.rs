//! File handle records and the fixed-capacity handle table.
//!
//! One [`FileHandle`] per open stream: the provider's opaque handle, the
//! canonical open flags, the stream buffer with its bookkeeping cursors,
//! and the logical position tracked independently of the provider's own
//! cursor.
//!
//! Invariants:
//! - `buf_index <= capacity` and `buf_valid <= capacity`
//! - a handle is usable only if `reserved` and `native` is present
//! - the buffer is owned by exactly one handle and dropped with its slot

use crate::services::{FilePos, NativeHandle};
use crate::stdio::mode::OpenFlags;

/// Stream buffer capacity, fixed once allocated.
pub const BUFSIZ: usize = 8192;

// ---------------------------------------------------------------------------
// Handle identity
// ---------------------------------------------------------------------------

/// Stable identifier for one slot in the handle table.
///
/// The three console streams live outside the numbered table at sentinel
/// ids that cannot collide with slot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(usize);

/// Console input stream.
pub const STDIN: FileId = FileId(usize::MAX - 2);
/// Console output stream.
pub const STDOUT: FileId = FileId(usize::MAX - 1);
/// Console error stream.
pub const STDERR: FileId = FileId(usize::MAX);

impl FileId {
    pub(crate) fn index(self) -> usize {
        self.0
    }

    /// Index into the console-stream records, if this is a sentinel id.
    pub(crate) fn std_index(self) -> Option<usize> {
        match self {
            STDIN => Some(0),
            STDOUT => Some(1),
            STDERR => Some(2),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// File handle
// ---------------------------------------------------------------------------

/// One open stream: provider handle, mode, buffer, and position state.
#[derive(Debug, Default)]
pub struct FileHandle {
    /// Slot-in-use marker.
    pub(crate) reserved: bool,
    /// Provider handle; `None` means "not actually open".
    pub(crate) native: Option<NativeHandle>,
    /// Canonical post-parse mode.
    pub(crate) open_flags: OpenFlags,
    /// Stream buffer, allocated lazily on first use.
    pub(crate) buffer: Option<Vec<u8>>,
    /// Next free slot inside the buffer (write cursor).
    pub(crate) buf_index: usize,
    /// Bytes meaningful for a pending flush.
    pub(crate) buf_valid: usize,
    /// A byte was written into the buffer since the last flush.
    pub(crate) buf_dirty: bool,
    /// Buffer contents were populated by a prior read and not superseded.
    pub(crate) buf_clean: bool,
    /// Logical file offset of the start of the buffer.
    pub(crate) position: FilePos,
    pub(crate) at_eof: bool,
    pub(crate) has_error: bool,
}

impl FileHandle {
    /// A vacant slot.
    pub(crate) fn vacant() -> Self {
        FileHandle::default()
    }

    /// Usable by stream operations: reserved with a live provider handle.
    pub fn is_open(&self) -> bool {
        self.reserved && self.native.is_some()
    }

    pub fn flags(&self) -> &OpenFlags {
        &self.open_flags
    }

    pub fn is_eof(&self) -> bool {
        self.at_eof
    }

    pub fn is_error(&self) -> bool {
        self.has_error
    }

    pub fn position(&self) -> FilePos {
        self.position
    }

    /// Buffer capacity, allocating on first use.
    pub(crate) fn buffer_capacity(&mut self) -> usize {
        self.buffer.get_or_insert_with(|| vec![0u8; BUFSIZ]).len()
    }
}

// ---------------------------------------------------------------------------
// Handle table
// ---------------------------------------------------------------------------

/// Fixed-capacity arena of handle slots.
///
/// Allocation scans for the first vacant slot (lowest index first) and
/// returns its stable id; a full table is a resource-exhaustion condition,
/// not a crash.
#[derive(Debug)]
pub struct HandleTable {
    slots: Vec<FileHandle>,
}

impl HandleTable {
    /// Create a table with `capacity` slots. Capacity is fixed for the
    /// table's lifetime.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, FileHandle::vacant);
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claim the first vacant slot: zero it, mark it reserved, return its id.
    pub fn allocate(&mut self) -> Option<FileId> {
        let index = self.slots.iter().position(|slot| !slot.reserved)?;
        self.slots[index] = FileHandle {
            reserved: true,
            ..FileHandle::vacant()
        };
        Some(FileId(index))
    }

    /// Release a slot: clears the reservation and drops the owned buffer.
    pub fn release(&mut self, id: FileId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = FileHandle::vacant();
        }
    }

    /// Slot access for reserved slots (open or mid-open).
    pub(crate) fn get(&self, id: FileId) -> Option<&FileHandle> {
        self.slots.get(id.index()).filter(|slot| slot.reserved)
    }

    pub(crate) fn get_mut(&mut self, id: FileId) -> Option<&mut FileHandle> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.reserved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_takes_lowest_free_slot_first() {
        let mut table = HandleTable::new(4);
        let a = table.allocate().unwrap();
        let b = table.allocate().unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);

        table.release(a);
        let c = table.allocate().unwrap();
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn allocate_fails_when_table_full() {
        let mut table = HandleTable::new(2);
        assert!(table.allocate().is_some());
        assert!(table.allocate().is_some());
        assert!(table.allocate().is_none());
    }

    #[test]
    fn release_drops_buffer_and_frees_slot() {
        let mut table = HandleTable::new(1);
        let id = table.allocate().unwrap();
        let slot = table.get_mut(id).unwrap();
        slot.buffer_capacity();
        assert!(slot.buffer.is_some());

        table.release(id);
        assert!(table.get(id).is_none());
        assert!(table.allocate().is_some());
    }

    #[test]
    fn allocate_zeroes_recycled_slot() {
        let mut table = HandleTable::new(1);
        let id = table.allocate().unwrap();
        {
            let slot = table.get_mut(id).unwrap();
            slot.buf_index = 7;
            slot.has_error = true;
        }
        table.release(id);

        let id = table.allocate().unwrap();
        let slot = table.get(id).unwrap();
        assert_eq!(slot.buf_index, 0);
        assert!(!slot.has_error);
    }

    #[test]
    fn sentinel_ids_never_alias_table_slots() {
        assert!(STDIN.std_index().is_some());
        assert!(STDOUT.std_index().is_some());
        assert!(STDERR.std_index().is_some());
        assert!(FileId(0).std_index().is_none());
    }

    #[test]
    fn vacant_handle_is_not_open() {
        let handle = FileHandle::vacant();
        assert!(!handle.is_open());
        assert_eq!(handle.position(), FilePos::At(0));
    }
}

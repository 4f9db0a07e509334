//! Stable record locator type.

use std::fmt;

use crate::common::PageId;

/// Locates one stored record: the heap page it lives on and its 0-based slot
/// within that page's record area.
///
/// A `RecordId` is stable for the lifetime of the store because the heap is
/// append-only: records are never moved, updated, or deleted. Leaf entries
/// of the index point back into the heap through these.
///
/// # Example
/// ```
/// use courtdb::{PageId, RecordId};
///
/// let rid = RecordId::new(PageId::new(3), 17);
/// assert_eq!(format!("{}", rid), "(3,17)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    /// Heap page holding the record.
    pub page: PageId,
    /// 0-based index into the page's record area.
    pub slot: u32,
}

impl RecordId {
    /// Create a new RecordId.
    #[inline]
    pub fn new(page: PageId, slot: u32) -> Self {
        RecordId { page, slot }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.page.0, self.slot)
    }
}

//! Mutable page views for the two node kinds.
//!
//! A node view is an owned page buffer bound to a page id. The store is
//! passed to `create`/`open`/`flush` rather than held in the view, so the
//! bulk loader can keep two views alive (a filling leaf and its successor)
//! while still owning the store exclusively.
//!
//! Mutators append at the current key-count offset and bump the count; they
//! never reorder or validate ordering - the bulk loader feeds entries
//! pre-sorted. Nothing is durable before `flush`.

use crate::common::{Error, PageId, RecordId, Result};
use crate::index::layout::{
    self, INTERNAL_ENTRY_BYTES, INTERNAL_FIRST_CHILD_BYTES, LEAF_ENTRY_BYTES, NODE_HEADER_BYTES,
    NODE_TYPE_INTERNAL, NODE_TYPE_LEAF, OFF_KEY_COUNT, OFF_NEXT_LEAF, OFF_TYPE,
};
use crate::storage::page::Page;
use crate::storage::PageStore;

/// View over one leaf page: a sorted run of (key, record id) entries plus a
/// link to the next leaf.
pub struct LeafNode {
    page_id: PageId,
    page: Page,
}

impl LeafNode {
    /// Allocate a fresh page and initialize a leaf header in memory
    /// (key count 0, no next leaf). Durable only after [`flush`](Self::flush).
    pub fn create(store: &mut PageStore) -> Result<Self> {
        let page_id = store.allocate_page()?;
        let mut page = Page::new();
        page.write_u8(OFF_TYPE, NODE_TYPE_LEAF);
        page.write_u16(OFF_KEY_COUNT, 0);
        page.write_i32(OFF_NEXT_LEAF, -1);
        Ok(Self { page_id, page })
    }

    /// Read an existing leaf page back from the store.
    ///
    /// # Errors
    /// `Error::InvalidNodeType` if the page's type byte is not a leaf.
    pub fn open(store: &mut PageStore, page_id: PageId) -> Result<Self> {
        let page = store.read_page(page_id)?;
        let found = page.read_u8(OFF_TYPE);
        if found != NODE_TYPE_LEAF {
            return Err(Error::InvalidNodeType {
                page_id,
                expected: NODE_TYPE_LEAF,
                found,
            });
        }
        Ok(Self { page_id, page })
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.page.read_u16(OFF_KEY_COUNT) as usize
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        layout::leaf_capacity()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.key_count() >= self.capacity()
    }

    /// The next leaf in the chain, `None` for the last leaf.
    pub fn next_leaf(&self) -> Option<PageId> {
        let raw = self.page.read_i32(OFF_NEXT_LEAF);
        if raw < 0 {
            None
        } else {
            Some(PageId::new(raw as u32))
        }
    }

    /// Link this leaf to its successor.
    pub fn set_next_leaf(&mut self, next: PageId) {
        self.page.write_i32(OFF_NEXT_LEAF, next.0 as i32);
    }

    /// Append one (key, record id) entry at the current key-count offset.
    pub fn add(&mut self, key: f32, rid: RecordId) {
        let i = self.key_count();
        debug_assert!(i < self.capacity(), "leaf overflow");
        let off = NODE_HEADER_BYTES + i * LEAF_ENTRY_BYTES;
        self.page.write_f32(off, key);
        self.page.write_i32(off + 4, rid.page.0 as i32);
        self.page.write_i32(off + 8, rid.slot as i32);
        self.page.write_u16(OFF_KEY_COUNT, (i + 1) as u16);
    }

    /// Read entry `i` back as (key, record id).
    pub fn entry(&self, i: usize) -> (f32, RecordId) {
        debug_assert!(i < self.key_count());
        let off = NODE_HEADER_BYTES + i * LEAF_ENTRY_BYTES;
        let key = self.page.read_f32(off);
        let page = self.page.read_i32(off + 4) as u32;
        let slot = self.page.read_i32(off + 8) as u32;
        (key, RecordId::new(PageId::new(page), slot))
    }

    /// Persist the buffer to the node's page.
    pub fn flush(&self, store: &mut PageStore) -> Result<()> {
        store.write_page(self.page_id, &self.page)
    }
}

/// View over one internal page: a first-child pointer followed by
/// (separator key, right child) entries.
///
/// Separator `i` equals the minimum key of the subtree rooted at child
/// `i + 1` - the min-key convention, not a classic bound.
#[derive(Debug)]
pub struct InternalNode {
    page_id: PageId,
    page: Page,
}

impl InternalNode {
    /// Allocate a fresh page and initialize an internal header in memory.
    pub fn create(store: &mut PageStore) -> Result<Self> {
        let page_id = store.allocate_page()?;
        let mut page = Page::new();
        page.write_u8(OFF_TYPE, NODE_TYPE_INTERNAL);
        page.write_u16(OFF_KEY_COUNT, 0);
        Ok(Self { page_id, page })
    }

    /// Read an existing internal page back from the store.
    ///
    /// # Errors
    /// `Error::InvalidNodeType` if the page's type byte is not internal.
    pub fn open(store: &mut PageStore, page_id: PageId) -> Result<Self> {
        let page = store.read_page(page_id)?;
        let found = page.read_u8(OFF_TYPE);
        if found != NODE_TYPE_INTERNAL {
            return Err(Error::InvalidNodeType {
                page_id,
                expected: NODE_TYPE_INTERNAL,
                found,
            });
        }
        Ok(Self { page_id, page })
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.page.read_u16(OFF_KEY_COUNT) as usize
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        layout::internal_capacity()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.key_count() >= self.capacity()
    }

    /// Set the leading first-child pointer.
    pub fn set_first_child(&mut self, child: PageId) {
        self.page.write_i32(NODE_HEADER_BYTES, child.0 as i32);
    }

    /// The leading first-child pointer.
    pub fn first_child(&self) -> PageId {
        PageId::new(self.page.read_i32(NODE_HEADER_BYTES) as u32)
    }

    /// Append one (separator key, right child) entry.
    pub fn append(&mut self, separator: f32, right_child: PageId) {
        let i = self.key_count();
        debug_assert!(i < self.capacity(), "internal overflow");
        let off = NODE_HEADER_BYTES + INTERNAL_FIRST_CHILD_BYTES + i * INTERNAL_ENTRY_BYTES;
        self.page.write_f32(off, separator);
        self.page.write_i32(off + 4, right_child.0 as i32);
        self.page.write_u16(OFF_KEY_COUNT, (i + 1) as u16);
    }

    /// Read separator key `i`.
    pub fn separator(&self, i: usize) -> f32 {
        debug_assert!(i < self.key_count());
        let off = NODE_HEADER_BYTES + INTERNAL_FIRST_CHILD_BYTES + i * INTERNAL_ENTRY_BYTES;
        self.page.read_f32(off)
    }

    /// Child `i`, for `i` in `0..=key_count()`: 0 is the first child, child
    /// `i > 0` is the right child of separator `i - 1`.
    pub fn child(&self, i: usize) -> PageId {
        debug_assert!(i <= self.key_count());
        if i == 0 {
            return self.first_child();
        }
        let off = NODE_HEADER_BYTES + INTERNAL_FIRST_CHILD_BYTES + (i - 1) * INTERNAL_ENTRY_BYTES;
        PageId::new(self.page.read_i32(off + 4) as u32)
    }

    /// All separator keys physically present in the page.
    pub fn separators(&self) -> Vec<f32> {
        (0..self.key_count()).map(|i| self.separator(i)).collect()
    }

    /// Persist the buffer to the node's page.
    pub fn flush(&self, store: &mut PageStore) -> Result<()> {
        store.write_page(self.page_id, &self.page)
    }
}

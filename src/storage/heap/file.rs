//! Append-only heap of fixed-size records.

use tracing::debug;

use crate::common::config::PAGE_SIZE;
use crate::common::{PageId, RecordId, Result};
use crate::record::{codec, GameRecord, RECORD_SIZE};
use crate::storage::heap::Appender;
use crate::storage::PageStore;

/// Bytes reserved at the front of every heap page: the used-count at offset 0.
pub const HEAP_HEADER_BYTES: usize = 4;

/// Sequential record store on top of a [`PageStore`].
///
/// Records are packed strictly in append order and never moved, updated, or
/// deleted, which is what makes a [`RecordId`] a stable locator. The heap
/// occupies pages `1..` of the store (page 0 is the superblock); the current
/// data page is always the last allocated page.
///
/// # Page Format
/// ```text
/// ┌───────────┬──────────┬──────────┬─────┬──────────┬────────┐
/// │ used: u32 │ record 0 │ record 1 │ ... │ record k │ unused │
/// │ (4 bytes) │ (36 B)   │ (36 B)   │     │ (36 B)   │        │
/// └───────────┴──────────┴──────────┴─────┴──────────┴────────┘
/// ```
/// `0 <= used <= records_per_page`, with `records_per_page = (4096-4)/36 = 113`.
///
/// `HeapFile` itself holds no I/O state - every operation borrows the store
/// it acts on, so the heap view and the bulk loader can take turns on the
/// same `PageStore` without sharing a handle.
#[derive(Debug, Clone)]
pub struct HeapFile {
    records_per_page: u32,
}

impl HeapFile {
    /// Create a heap view; the packing factor is derived from the page and
    /// record sizes alone.
    pub fn new() -> Self {
        Self {
            records_per_page: ((PAGE_SIZE - HEAP_HEADER_BYTES) / RECORD_SIZE) as u32,
        }
    }

    /// Maximum number of records per heap page.
    #[inline]
    pub fn records_per_page(&self) -> u32 {
        self.records_per_page
    }

    /// Append one record, persisting the touched page immediately.
    ///
    /// Allocates the superblock if the store has no pages at all, and a
    /// fresh data page when only the superblock exists or the current data
    /// page is full. The record lands at `4 + used * 36` and the page's
    /// used-count is bumped before the full page is written back.
    pub fn append(&self, store: &mut PageStore, record: &GameRecord) -> Result<RecordId> {
        let mut total_pages = store.page_count();
        if total_pages == 0 {
            store.allocate_page()?; // superblock page 0
            total_pages = 1;
        }

        // ensure we have at least one data page
        let mut page_id = PageId::new(total_pages - 1);
        if page_id.0 == 0 {
            page_id = store.allocate_page()?;
        }

        let mut page = store.read_page(page_id)?;
        let mut used = page.read_u32(0);
        if used >= self.records_per_page {
            page_id = store.allocate_page()?;
            page = store.read_page(page_id)?;
            used = 0;
        }

        let offset = HEAP_HEADER_BYTES + used as usize * RECORD_SIZE;
        codec::encode(record, &mut page.as_mut_slice()[offset..offset + RECORD_SIZE])?;
        page.write_u32(0, used + 1);
        store.write_page(page_id, &page)?;
        Ok(RecordId::new(page_id, used))
    }

    /// Scan every record in append order.
    ///
    /// Pages `1..page_count` are visited ascending, and slots `0..used`
    /// ascending within each page, so the result order equals the original
    /// append order.
    ///
    /// A stored used-count outside `[0, records_per_page]` stops the scan
    /// immediately and returns only the records collected so far - the bad
    /// page is not skipped. Callers that need completeness must verify page
    /// counts separately; a store that still carries index pages behind the
    /// heap data terminates the scan at the first one.
    pub fn scan_all(&self, store: &mut PageStore) -> Result<Vec<(GameRecord, RecordId)>> {
        let mut out = Vec::new();
        let pages = store.page_count();

        for pid in 1..pages {
            let page = store.read_page(PageId::new(pid))?;
            let used = page.read_i32(0);

            if used < 0 || used as u32 > self.records_per_page {
                debug!(page = pid, used, "used-count out of range, stopping scan");
                break;
            }

            for slot in 0..used as u32 {
                let offset = HEAP_HEADER_BYTES + slot as usize * RECORD_SIZE;

                // extra safety: don't read past page end
                if offset + RECORD_SIZE > PAGE_SIZE {
                    break;
                }

                let record = codec::decode(&page.as_slice()[offset..offset + RECORD_SIZE]);
                out.push((record, RecordId::new(PageId::new(pid), slot)));
            }
        }
        Ok(out)
    }

    /// Open a buffered [`Appender`] over the store.
    ///
    /// The appender borrows the store exclusively for its scope, which is
    /// the crate's one-writer discipline enforced by the type system.
    pub fn appender<'s>(&self, store: &'s mut PageStore) -> Result<Appender<'s>> {
        Appender::new(store, self.records_per_page)
    }
}

impl Default for HeapFile {
    fn default() -> Self {
        Self::new()
    }
}

//! Buffered appender for bulk ingestion.

use tracing::warn;

use crate::common::{PageId, RecordId, Result};
use crate::record::{codec, GameRecord, RECORD_SIZE};
use crate::storage::heap::file::HEAP_HEADER_BYTES;
use crate::storage::page::Page;
use crate::storage::PageStore;

/// Buffered heap appender: one page write per filled page, one final write.
///
/// The plain [`HeapFile::append`](crate::storage::HeapFile::append) persists
/// the current page on every call. During bulk ingestion that is one 4KB
/// write (plus fsync) per 36-byte record; the appender instead keeps the
/// current page and its used-count in memory and writes only when a page
/// fills or the appender goes out of scope.
///
/// For the same input sequence the file contents are byte-identical to the
/// unbuffered path.
///
/// # Scoped flush
/// [`close`](Appender::close) flushes the tail page and reports any error.
/// Dropping an unclosed appender flushes as a backstop so every exit path
/// persists the tail, but a failed write can only be logged there - prefer
/// `close` when the result matters.
pub struct Appender<'s> {
    store: &'s mut PageStore,
    records_per_page: u32,
    page_id: PageId,
    page: Page,
    used: u32,
    finished: bool,
}

impl<'s> Appender<'s> {
    pub(crate) fn new(store: &'s mut PageStore, records_per_page: u32) -> Result<Self> {
        // ensure superblock
        if store.page_count() == 0 {
            store.allocate_page()?;
        }

        // open the last page if it is a data page, else start a fresh one
        let last = store.page_count() - 1;
        let (page_id, page, used) = if last == 0 {
            let pid = store.allocate_page()?;
            (pid, Page::new(), 0)
        } else {
            let pid = PageId::new(last);
            let page = store.read_page(pid)?; // one read total
            let used = page.read_i32(0);
            if used < 0 || used as u32 > records_per_page {
                // uninitialized page safeguard
                let mut page = page;
                page.reset();
                (pid, page, 0)
            } else {
                (pid, page, used as u32)
            }
        };

        Ok(Self {
            store,
            records_per_page,
            page_id,
            page,
            used,
            finished: false,
        })
    }

    /// Append one record into the in-memory page, rolling to a freshly
    /// allocated page (and writing the full one) when the current page is
    /// at capacity.
    pub fn add(&mut self, record: &GameRecord) -> Result<RecordId> {
        if self.used >= self.records_per_page {
            self.store.write_page(self.page_id, &self.page)?; // one write per full page
            self.page_id = self.store.allocate_page()?;
            self.page.reset();
            self.used = 0;
        }

        let offset = HEAP_HEADER_BYTES + self.used as usize * RECORD_SIZE;
        codec::encode(record, &mut self.page.as_mut_slice()[offset..offset + RECORD_SIZE])?;
        self.used += 1;
        self.page.write_u32(0, self.used);
        Ok(RecordId::new(self.page_id, self.used - 1))
    }

    /// Flush the tail page and consume the appender.
    ///
    /// After `close` returns, everything added is durable.
    pub fn close(mut self) -> Result<()> {
        self.store.write_page(self.page_id, &self.page)?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for Appender<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.store.write_page(self.page_id, &self.page) {
                warn!(page = %self.page_id, error = %e, "appender drop flush failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::HeapFile;
    use tempfile::tempdir;

    fn record(points: i32) -> GameRecord {
        GameRecord {
            game_date: "2003-12-25".to_string(),
            team_id: 1610612747,
            points,
            fg_pct: 0.45,
            ft_pct: 0.7,
            fg3_pct: 0.33,
            assists: 20,
            rebounds: 40,
            wins: 1,
        }
    }

    #[test]
    fn test_appender_matches_unbuffered_bytes() {
        let dir = tempdir().unwrap();
        let heap = HeapFile::new();
        let n = heap.records_per_page() * 2 + 5; // three pages, last partial

        // Unbuffered path
        let plain_path = dir.path().join("plain.db");
        {
            let mut store = PageStore::create(&plain_path).unwrap();
            for i in 0..n {
                heap.append(&mut store, &record(i as i32)).unwrap();
            }
        }

        // Buffered path
        let buffered_path = dir.path().join("buffered.db");
        {
            let mut store = PageStore::create(&buffered_path).unwrap();
            let mut app = heap.appender(&mut store).unwrap();
            for i in 0..n {
                app.add(&record(i as i32)).unwrap();
            }
            app.close().unwrap();
        }

        let plain = std::fs::read(&plain_path).unwrap();
        let buffered = std::fs::read(&buffered_path).unwrap();
        assert_eq!(plain, buffered);
    }

    #[test]
    fn test_appender_returns_same_ids_as_unbuffered() {
        let dir = tempdir().unwrap();
        let heap = HeapFile::new();
        let n = heap.records_per_page() + 3;

        let mut store = PageStore::create(dir.path().join("t.db")).unwrap();
        let mut app = heap.appender(&mut store).unwrap();

        let mut ids = Vec::new();
        for i in 0..n {
            ids.push(app.add(&record(i as i32)).unwrap());
        }
        app.close().unwrap();

        assert_eq!(ids[0], RecordId::new(PageId::new(1), 0));
        let last_on_first = heap.records_per_page() - 1;
        assert_eq!(
            ids[last_on_first as usize],
            RecordId::new(PageId::new(1), last_on_first)
        );
        assert_eq!(
            ids[heap.records_per_page() as usize],
            RecordId::new(PageId::new(2), 0)
        );
    }

    #[test]
    fn test_drop_flushes_tail_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.db");
        let heap = HeapFile::new();

        {
            let mut store = PageStore::create(&path).unwrap();
            let mut app = heap.appender(&mut store).unwrap();
            for i in 0..5 {
                app.add(&record(i)).unwrap();
            }
            // no close() - the drop backstop must flush
        }

        let mut store = PageStore::open(&path).unwrap();
        let rows = heap.scan_all(&mut store).unwrap();
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_appender_resumes_partial_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.db");
        let heap = HeapFile::new();

        {
            let mut store = PageStore::create(&path).unwrap();
            let mut app = heap.appender(&mut store).unwrap();
            for i in 0..3 {
                app.add(&record(i)).unwrap();
            }
            app.close().unwrap();
        }

        // A second session continues on the same partial page
        {
            let mut store = PageStore::open(&path).unwrap();
            let mut app = heap.appender(&mut store).unwrap();
            let rid = app.add(&record(3)).unwrap();
            assert_eq!(rid, RecordId::new(PageId::new(1), 3));
            app.close().unwrap();
        }

        let mut store = PageStore::open(&path).unwrap();
        assert_eq!(store.page_count(), 2);
        let rows = heap.scan_all(&mut store).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].0.points, 3);
    }
}

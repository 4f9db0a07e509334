//! Page store - low-level file I/O for database pages.
//!
//! The [`PageStore`] handles all direct file operations:
//! - Reading and writing pages
//! - Allocating new pages
//! - Truncating the tail of the file
//! - Managing the database file and its reserved superblock

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};
use crate::storage::page::Page;

/// Manages disk I/O for a single database file.
///
/// # File Layout
/// The database is stored as a single file with pages laid out sequentially:
/// ```text
/// ┌────────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Page 0     │ Page 1  │ Page 2  │  ...    │ Page N  │
/// │ superblock │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └────────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0        4096     8192     ...    N×4096
/// ```
///
/// Page N is located at file offset `N × PAGE_SIZE`. Page 0 is the reserved
/// all-zero superblock; it is (re)created whenever the backing file is empty,
/// so a usable store always has at least one page.
///
/// # Thread Safety
/// `PageStore` is **single-threaded**: exactly one writer, no internal
/// locking. Callers serialize the append phase and the build phase.
///
/// # Durability
/// All writes are followed by `fsync()`. Every operation is a synchronous,
/// immediate I/O with no internal buffering; a failed operation propagates
/// unchanged and is never retried.
pub struct PageStore {
    file: File,
    /// Number of pages in the file.
    page_count: u32,
}

impl PageStore {
    /// Create a fresh database file, resetting any existing content.
    ///
    /// The file is truncated to empty and the superblock is written as
    /// page 0, so the returned store has exactly one page.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or truncated.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let mut store = Self {
            file,
            page_count: 0,
        };
        store.allocate_page()?; // superblock
        Ok(store)
    }

    /// Open an existing database file.
    ///
    /// If the file turns out to be empty, the superblock is (re)created.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        // Calculate page count from file size
        let metadata = file.metadata()?;
        let file_size = metadata.len();
        let page_count = (file_size / PAGE_SIZE as u64) as u32;

        let mut store = Self { file, page_count };
        if store.page_count == 0 {
            store.allocate_page()?; // superblock
        }
        Ok(store)
    }

    /// Open an existing database file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Read a page from disk.
    ///
    /// # Errors
    /// Returns `Error::PageNotFound` if the page doesn't exist.
    pub fn read_page(&mut self, page_id: PageId) -> Result<Page> {
        if page_id.0 >= self.page_count {
            return Err(Error::PageNotFound(page_id.0));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let mut page = Page::new();
        self.file.read_exact(page.as_mut_slice())?;

        Ok(page)
    }

    /// Write a page to disk.
    ///
    /// The page must have been previously allocated with `allocate_page()`.
    ///
    /// # Durability
    /// This method calls `fsync()` after writing to ensure the data is
    /// persisted to disk.
    ///
    /// # Errors
    /// Returns `Error::PageNotFound` if the page hasn't been allocated.
    pub fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        if page_id.0 >= self.page_count {
            return Err(Error::PageNotFound(page_id.0));
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_slice())?;
        self.file.sync_all()?; // fsync for durability

        Ok(())
    }

    /// Allocate a new page on disk.
    ///
    /// Returns the `PageId` of the newly allocated page. The page is
    /// initialized with zeros. Ids are dense and monotonically increasing;
    /// individual pages are never freed, only bulk-truncated from the tail.
    ///
    /// # Durability
    /// This method extends the file and calls `fsync()` to ensure the
    /// allocation is durable.
    pub fn allocate_page(&mut self) -> Result<PageId> {
        let page_id = PageId::new(self.page_count);

        // Extend file with a zeroed page
        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let zeros = [0u8; PAGE_SIZE];
        self.file.write_all(&zeros)?;
        self.file.sync_all()?;

        self.page_count += 1;
        Ok(page_id)
    }

    /// Discard all pages at index `>= n`, shrinking the file.
    ///
    /// A no-op when the store already has `n` pages or fewer. The bulk
    /// loader uses this to drop the index pages of a previous build before
    /// appending a fresh tree behind the heap data.
    pub fn truncate_to_page_count(&mut self, n: u32) -> Result<()> {
        if n >= self.page_count {
            return Ok(());
        }

        self.file.set_len((n as u64) * (PAGE_SIZE as u64))?;
        self.file.sync_all()?;
        self.page_count = n;
        Ok(())
    }

    /// Get the number of pages in the database.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Get the total size of the database file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.page_count as u64) * (PAGE_SIZE as u64)
    }
}

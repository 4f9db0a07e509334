//! courtdb - page-oriented game record storage with a bulk-built B+ tree index.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           courtdb                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Tools (src/bin/)                         │   │
//! │  │      load_games (CSV → heap) · bulk_build (heap → tree)  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Index Layer (index/)                        │   │
//! │  │     layout + LeafNode/InternalNode views + bulk loader   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │             Record Layer (record/)                       │   │
//! │  │        GameRecord + 36-byte fixed codec + dates          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │            Storage Layer (storage/)                      │   │
//! │  │      PageStore + Page + HeapFile/Appender                │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, RecordId, Error, config)
//! - [`storage`] - Disk I/O, page format, and the append-only heap
//! - [`record`] - The domain record and its fixed-size codec
//! - [`index`] - B+ tree node layouts and the bottom-up bulk loader
//!
//! # Quick Start
//! ```no_run
//! use courtdb::index;
//! use courtdb::storage::{HeapFile, PageStore};
//! use courtdb::GameRecord;
//!
//! // Create a new database file and append a record
//! let mut store = PageStore::create("games.db").unwrap();
//! let heap = HeapFile::new();
//! let record = GameRecord {
//!     game_date: "12/25/2003".to_string(),
//!     team_id: 1610612747,
//!     points: 98,
//!     fg_pct: 0.456,
//!     ft_pct: 0.789,
//!     fg3_pct: 0.333,
//!     assists: 22,
//!     rebounds: 44,
//!     wins: 1,
//! };
//! heap.append(&mut store, &record).unwrap();
//!
//! // Build the index over everything appended so far
//! let stats = index::build(&mut store, &heap).unwrap();
//! println!("{}", stats);
//! ```

// Core modules
pub mod common;
pub mod index;
pub mod record;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, PageId, RecordId, Result};

pub use index::{BuildStats, InternalNode, LeafNode};
pub use record::{GameRecord, RECORD_SIZE};
pub use storage::{Appender, HeapFile, PageStore};

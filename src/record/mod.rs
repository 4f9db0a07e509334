//! The domain record and its fixed-size binary codec.
//!
//! - [`GameRecord`] - the 9-field record stored in the heap
//! - [`codec`] - the 36-byte layout plus the permissive date conversion

pub mod codec;
mod game;

pub use codec::RECORD_SIZE;
pub use game::GameRecord;

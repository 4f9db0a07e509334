//! Append-only heap record store.
//!
//! - [`HeapFile`] - append / scan over packed fixed-size records
//! - [`Appender`] - buffered bulk append with a scoped final flush

mod appender;
pub(crate) mod file;

pub use appender::Appender;
pub use file::{HeapFile, HEAP_HEADER_BYTES};

//! B+ tree index: node formats and the bulk loader.
//!
//! The tree is a write-once artifact: [`bulk::build`] constructs it bottom-up
//! from the sorted heap content, and nothing in this crate mutates it
//! afterwards. Point lookup and range scans over the built tree are not
//! provided here.

pub mod bulk;
pub mod layout;
mod node;

pub use bulk::{build, BuildStats};
pub use node::{InternalNode, LeafNode};

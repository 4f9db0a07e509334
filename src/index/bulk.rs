//! Bottom-up bulk construction of the B+ tree.
//!
//! The loader reads the whole heap, sorts the (key, record id) pairs in
//! memory, lays down the leaf chain left to right, then builds internal
//! levels until a single root remains. It assumes the full key set fits in
//! memory for sorting, which bounds the dataset sizes this design suits.

use std::fmt;

use tracing::{debug, info};

use crate::common::{PageId, RecordId, Result};
use crate::index::node::{InternalNode, LeafNode};
use crate::storage::{HeapFile, PageStore};

/// Minimal per-node info carried between levels during construction:
/// a finished node and the minimum key reachable through it. Never
/// persisted; levels are processed strictly left to right.
struct NodeRef {
    page_id: PageId,
    min_key: f32,
}

/// Summary of one completed build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildStats {
    /// Page holding the root node (a leaf when the tree has one level).
    pub root_page_id: PageId,
    /// Number of levels, counting the leaf level (1 = the root is a leaf).
    pub height: u32,
    /// Total leaf pages written.
    pub leaf_count: u32,
    /// Total internal pages written.
    pub internal_count: u32,
    /// Separator keys physically present in the root page; empty when the
    /// root is a leaf.
    pub root_keys: Vec<f32>,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuildStats {{ root: {}, height: {}, leaves: {}, internals: {}, root_keys: {} }}",
            self.root_page_id,
            self.height,
            self.leaf_count,
            self.internal_count,
            self.root_keys.len()
        )
    }
}

/// Read every heap record and sort the (key, record id) pairs ascending.
///
/// `sort_by` is stable, so equal keys keep their heap scan order.
/// `total_cmp` gives NaN keys a fixed place (after +inf) instead of
/// making the order undefined.
fn read_all_pairs(store: &mut PageStore, heap: &HeapFile) -> Result<Vec<(f32, RecordId)>> {
    let rows = heap.scan_all(store)?;
    let mut pairs: Vec<(f32, RecordId)> =
        rows.into_iter().map(|(rec, rid)| (rec.key(), rid)).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(pairs)
}

/// Build the complete index over the current heap content.
///
/// Rebuilding is idempotent: the store is first truncated back to the
/// superblock plus the heap data pages, discarding any index left by a
/// previous build. The flip side is that there is no rollback - a build
/// that fails after the truncation leaves the store without a usable
/// index.
pub fn build(store: &mut PageStore, heap: &HeapFile) -> Result<BuildStats> {
    let pairs = read_all_pairs(store, heap)?;
    debug!(records = pairs.len(), "sorted key set ready");

    // drop any previous index so rebuilds don't append forever
    let data_pages = (pairs.len() as u32).div_ceil(heap.records_per_page());
    store.truncate_to_page_count(1 + data_pages)?;

    // 1) Build the leaf chain, collecting NodeRefs with min keys
    let mut current: Vec<NodeRef> = Vec::new();
    let mut leaf_count: u32 = 1;

    if pairs.is_empty() {
        // empty dataset -> one empty leaf
        let leaf = LeafNode::create(store)?;
        leaf.flush(store)?;
        current.push(NodeRef {
            page_id: leaf.page_id(),
            min_key: f32::NEG_INFINITY,
        });
    } else {
        let mut leaf = LeafNode::create(store)?;
        let mut current_min = pairs[0].0;

        for &(key, rid) in &pairs {
            if leaf.is_full() {
                let next = LeafNode::create(store)?;
                leaf.set_next_leaf(next.page_id());
                leaf.flush(store)?;
                current.push(NodeRef {
                    page_id: leaf.page_id(),
                    min_key: current_min,
                });

                leaf = next;
                leaf_count += 1;
                current_min = key;
            }
            leaf.add(key, rid);
        }
        leaf.flush(store)?;
        current.push(NodeRef {
            page_id: leaf.page_id(),
            min_key: current_min,
        });
    }

    let mut height: u32 = 1;
    let mut internal_count: u32 = 0;

    // 2) Build parent levels until one root remains
    while current.len() > 1 {
        let mut next_level: Vec<NodeRef> = Vec::new();

        let mut i = 0;
        while i < current.len() {
            let mut parent = InternalNode::create(store)?;
            internal_count += 1;

            // one first child plus up to capacity() more children
            let cap = parent.capacity();
            parent.set_first_child(current[i].page_id);
            let parent_min_key = current[i].min_key;
            i += 1;

            let mut appended = 0;
            while i < current.len() && appended < cap {
                parent.append(current[i].min_key, current[i].page_id);
                i += 1;
                appended += 1;
            }
            parent.flush(store)?;

            // the min of the first child propagates upward through every level
            next_level.push(NodeRef {
                page_id: parent.page_id(),
                min_key: parent_min_key,
            });
        }

        debug!(level = height, nodes = next_level.len(), "built internal level");
        current = next_level;
        height += 1;
    }

    let root_page_id = current[0].page_id;
    let root_keys = if height == 1 {
        Vec::new()
    } else {
        InternalNode::open(store, root_page_id)?.separators()
    };

    let stats = BuildStats {
        root_page_id,
        height,
        leaf_count,
        internal_count,
        root_keys,
    };
    info!(%stats, "bulk load complete");
    Ok(stats)
}

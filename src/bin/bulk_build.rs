//! Build the B+ tree index over an existing heap and print its shape.
//!
//! ```bash
//! bulk_build --db db.data
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use courtdb::index::{self, layout};
use courtdb::{HeapFile, PageStore};

/// Bulk-build the index and report tree statistics.
#[derive(Parser, Debug)]
#[command(name = "bulk_build", about = "Bulk-build the B+ tree index over the heap")]
struct Args {
    /// Database file
    #[arg(long, default_value = "db.data", value_name = "FILE")]
    db: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // No reset: the heap being indexed must survive
    let mut store = PageStore::open(&args.db)?;
    let heap = HeapFile::new();

    let stats = index::build(&mut store, &heap)?;

    let n = layout::max_children();
    let total_nodes = stats.leaf_count + stats.internal_count;

    println!("Parameter n of the B+ tree: {}", n);
    println!("Number of nodes of the B+ tree: {}", total_nodes);
    println!("Number of levels of the B+ tree: {}", stats.height);
    println!("Content of the root node (only the keys): {:?}", stats.root_keys);
    Ok(())
}

//! Load a CSV/TSV export of game rows into the heap.
//!
//! Columns are located by header name, with a few accepted aliases per
//! field, so exports with reordered or renamed columns still load. The
//! delimiter is sniffed from the header line (tab wins over comma).
//!
//! ```bash
//! load_games games.txt --db db.data
//! load_games games.csv --keep       # append to an existing database
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use courtdb::storage::heap::HEAP_HEADER_BYTES;
use courtdb::{GameRecord, HeapFile, PageStore, PAGE_SIZE, RECORD_SIZE};

/// Load game rows into the record heap.
#[derive(Parser, Debug)]
#[command(name = "load_games", about = "Load game rows from a CSV/TSV file into the heap")]
struct Args {
    /// CSV or TSV file of game rows
    #[arg(default_value = "games.txt")]
    csv: PathBuf,

    /// Database file
    #[arg(long, default_value = "db.data", value_name = "FILE")]
    db: PathBuf,

    /// Keep the existing database file instead of resetting it
    #[arg(long)]
    keep: bool,
}

/// Resolved column positions for the nine record fields.
struct Columns {
    game_date: usize,
    team_id: usize,
    points: usize,
    fg_pct: usize,
    ft_pct: usize,
    fg3_pct: usize,
    assists: usize,
    rebounds: usize,
    wins: usize,
}

/// Normalize a header cell for matching: trim, uppercase, strip punctuation.
fn norm(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn col(index: &HashMap<String, usize>, candidates: &[&str]) -> Result<usize> {
    for c in candidates {
        if let Some(&pos) = index.get(&norm(c)) {
            return Ok(pos);
        }
    }
    bail!(
        "missing column, tried {:?} | have: {:?}",
        candidates,
        index.keys().collect::<Vec<_>>()
    )
}

fn map_columns(index: &HashMap<String, usize>) -> Result<Columns> {
    Ok(Columns {
        game_date: col(index, &["GAME_DATE_EST", "GAME_DATE", "DATE"])?,
        team_id: col(index, &["TEAM_ID_HOME", "HOME_TEAM_ID"])?,
        points: col(index, &["PTS_HOME", "HOME_PTS"])?,
        fg_pct: col(index, &["FG_PCT_HOME", "FGPCT_HOME"])?,
        ft_pct: col(index, &["FT_PCT_HOME", "FTPCT_HOME"])?, // index key
        fg3_pct: col(index, &["FG3_PCT_HOME", "FG3PCT_HOME"])?,
        assists: col(index, &["AST_HOME", "ASSISTS_HOME"])?,
        rebounds: col(index, &["REB_HOME", "REBOUNDS_HOME"])?,
        wins: col(index, &["HOME_TEAM_WINS", "HOMEWINS"])?,
    })
}

fn cell<'a>(row: &[&'a str], i: usize) -> &'a str {
    row.get(i).copied().unwrap_or("")
}

/// Blank numeric cells load as 0 rather than failing the row.
fn parse_i32_or_zero(s: &str) -> Result<i32> {
    let s = s.trim();
    if s.is_empty() {
        Ok(0)
    } else {
        s.parse().with_context(|| format!("bad integer {:?}", s))
    }
}

fn parse_f32_or_zero(s: &str) -> Result<f32> {
    let s = s.trim();
    if s.is_empty() {
        Ok(0.0)
    } else {
        s.parse().with_context(|| format!("bad float {:?}", s))
    }
}

fn parse_row(row: &[&str], cols: &Columns) -> Result<GameRecord> {
    Ok(GameRecord {
        game_date: cell(row, cols.game_date).to_string(),
        team_id: parse_i32_or_zero(cell(row, cols.team_id))?,
        points: parse_i32_or_zero(cell(row, cols.points))?,
        fg_pct: parse_f32_or_zero(cell(row, cols.fg_pct))?,
        ft_pct: parse_f32_or_zero(cell(row, cols.ft_pct))?,
        fg3_pct: parse_f32_or_zero(cell(row, cols.fg3_pct))?,
        assists: parse_i32_or_zero(cell(row, cols.assists))?,
        rebounds: parse_i32_or_zero(cell(row, cols.rebounds))?,
        wins: parse_i32_or_zero(cell(row, cols.wins))?,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    info!(
        db = %args.db.display(),
        csv = %args.csv.display(),
        reset = !args.keep,
        "loading games"
    );

    let mut store = if args.keep {
        PageStore::open_or_create(&args.db)?
    } else {
        PageStore::create(&args.db)?
    };
    let heap = HeapFile::new();

    let file = File::open(&args.csv).with_context(|| format!("open {}", args.csv.display()))?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| anyhow!("empty file: {}", args.csv.display()))??;

    // auto-detect tab vs comma
    let delim = if header.contains('\t') { '\t' } else { ',' };
    let header_cells: Vec<&str> = header.split(delim).collect();
    let index: HashMap<String, usize> = header_cells
        .iter()
        .enumerate()
        .map(|(i, c)| (norm(c), i))
        .collect();
    info!(headers = ?header_cells, "detected headers");

    let cols = map_columns(&index)?;

    let mut appender = heap.appender(&mut store)?;
    let mut count: u64 = 0;
    let mut line_no: u64 = 1;
    for line in lines {
        let line = line?;
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let row: Vec<&str> = line.split(delim).collect();
        let record = parse_row(&row, &cols)
            .with_context(|| format!("parse error on line {}: {:?}", line_no, line))?;
        appender
            .add(&record)
            .with_context(|| format!("append failed on line {}", line_no))?;
        count += 1;
    }
    appender.close()?;

    let records_per_block = (PAGE_SIZE - HEAP_HEADER_BYTES) / RECORD_SIZE;
    let data_pages = store.page_count().saturating_sub(1); // exclude superblock
    println!("Loaded records: {}", count);
    println!("Record size: {} bytes", RECORD_SIZE);
    println!("Records per block: {}", records_per_block);
    println!("Blocks used (data pages): {}", data_pages);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(header: &str, delim: char) -> HashMap<String, usize> {
        header
            .split(delim)
            .enumerate()
            .map(|(i, c)| (norm(c), i))
            .collect()
    }

    #[test]
    fn test_norm_strips_case_and_punctuation() {
        assert_eq!(norm(" fg_pct_home "), "FGPCTHOME");
        assert_eq!(norm("GAME_DATE_EST"), "GAMEDATEEST");
    }

    #[test]
    fn test_map_columns_accepts_aliases() {
        let index = index_of(
            "DATE,HOME_TEAM_ID,HOME_PTS,FGPCT_HOME,FTPCT_HOME,FG3PCT_HOME,ASSISTS_HOME,REBOUNDS_HOME,HOMEWINS",
            ',',
        );
        let cols = map_columns(&index).unwrap();
        assert_eq!(cols.game_date, 0);
        assert_eq!(cols.ft_pct, 4);
        assert_eq!(cols.wins, 8);
    }

    #[test]
    fn test_map_columns_missing_column_fails() {
        let index = index_of("DATE,HOME_TEAM_ID", ',');
        assert!(map_columns(&index).is_err());
    }

    #[test]
    fn test_parse_row_blank_cells_are_zero() {
        let index = index_of(
            "GAME_DATE_EST,TEAM_ID_HOME,PTS_HOME,FG_PCT_HOME,FT_PCT_HOME,FG3_PCT_HOME,AST_HOME,REB_HOME,HOME_TEAM_WINS",
            ',',
        );
        let cols = map_columns(&index).unwrap();

        let row: Vec<&str> = "2003-12-25,1610612747,,0.456,0.789,,22,44,1"
            .split(',')
            .collect();
        let rec = parse_row(&row, &cols).unwrap();
        assert_eq!(rec.points, 0);
        assert_eq!(rec.fg3_pct, 0.0);
        assert_eq!(rec.ft_pct, 0.789);
    }

    #[test]
    fn test_parse_row_short_row_pads_with_empty() {
        let index = index_of(
            "GAME_DATE_EST,TEAM_ID_HOME,PTS_HOME,FG_PCT_HOME,FT_PCT_HOME,FG3_PCT_HOME,AST_HOME,REB_HOME,HOME_TEAM_WINS",
            ',',
        );
        let cols = map_columns(&index).unwrap();

        let row: Vec<&str> = "2003-12-25,1610612747,98".split(',').collect();
        let rec = parse_row(&row, &cols).unwrap();
        assert_eq!(rec.points, 98);
        assert_eq!(rec.ft_pct, 0.0);
        assert_eq!(rec.wins, 0);
    }

    #[test]
    fn test_parse_row_bad_number_fails() {
        let index = index_of(
            "GAME_DATE_EST,TEAM_ID_HOME,PTS_HOME,FG_PCT_HOME,FT_PCT_HOME,FG3_PCT_HOME,AST_HOME,REB_HOME,HOME_TEAM_WINS",
            ',',
        );
        let cols = map_columns(&index).unwrap();

        let row: Vec<&str> = "2003-12-25,oops,98,0.4,0.7,0.3,22,44,1"
            .split(',')
            .collect();
        assert!(parse_row(&row, &cols).is_err());
    }
}

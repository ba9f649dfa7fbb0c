//! Raw complaint export → analysis input
//!
//! Keeps the narrative plus a few metadata columns, drops rows without a
//! narrative, renames it to `text` and samples down to `n` rows.

use crate::error::Result;
use crate::table::Table;
use std::path::Path;
use tracing::info;

pub const NARRATIVE_COLUMN: &str = "Consumer complaint narrative";

/// Columns carried over when present, narrative first
pub const KEPT_COLUMNS: &[&str] = &[
    NARRATIVE_COLUMN,
    "Product",
    "Issue",
    "Company",
    "Date received",
    "State",
];

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            sample_size: 5000,
            seed: 42,
        }
    }
}

/// Project, clean and sample a raw export
pub fn prepare_table(raw: &Table, options: &IngestOptions) -> Result<Table> {
    raw.require_columns(&[NARRATIVE_COLUMN])?;

    let kept: Vec<usize> = KEPT_COLUMNS
        .iter()
        .filter_map(|name| raw.column_index(name))
        .collect();

    let headers = kept
        .iter()
        .map(|&i| {
            if raw.headers[i] == NARRATIVE_COLUMN {
                "text".to_string()
            } else {
                raw.headers[i].clone()
            }
        })
        .collect();

    let mut table = Table::new(headers);
    for row in &raw.rows {
        // narrative is always the first kept column
        let narrative = row[kept[0]].trim();
        if narrative.is_empty() {
            continue;
        }

        let mut cells: Vec<String> = kept.iter().map(|&i| row[i].clone()).collect();
        cells[0] = narrative.to_string();
        table.rows.push(cells);
    }

    table.sample(options.sample_size, options.seed);
    Ok(table)
}

pub fn load_sample(in_csv: &Path, out_csv: &Path, options: &IngestOptions) -> Result<usize> {
    let raw = Table::read_csv(in_csv)?;
    let table = prepare_table(&raw, options)?;
    table.write_csv(out_csv)?;

    info!(path = %out_csv.display(), rows = table.len(), "saved cleaned sample");
    Ok(table.len())
}

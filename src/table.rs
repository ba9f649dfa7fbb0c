//! In-memory CSV table
//!
//! Headers plus string rows; enough for column checks, sampling and
//! appending result columns without fixing a schema up front.

use crate::error::{AnalyzerError, Result};
use csv::{ReaderBuilder, Writer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AnalyzerError::FileNotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Short rows are padded with empty cells; a row wider than the header
    /// is an error
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(AnalyzerError::TooManyFields {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            let mut row: Vec<String> = record.iter().map(|f| f.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        self.to_writer(file)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Indices of the named columns, or `MissingColumns` listing every absent one
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>> {
        let mut missing: Vec<String> = names
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            missing.sort();
            return Err(AnalyzerError::MissingColumns(missing));
        }

        Ok(names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect())
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    /// Keep rows satisfying the predicate
    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Vec<String>) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Seeded sample of `n` rows, preserving input order; no-op when `n >= len`
    pub fn sample(&mut self, n: usize, seed: u64) {
        if self.rows.len() <= n {
            return;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut picked = rand::seq::index::sample(&mut rng, self.rows.len(), n).into_vec();
        picked.sort_unstable();

        let mut rows = std::mem::take(&mut self.rows);
        self.rows = picked
            .into_iter()
            .map(|i| std::mem::take(&mut rows[i]))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn sample_table() -> Table {
        Table::from_reader("text,Issue\nfirst,a\nsecond,b\nthird,c\n".as_bytes()).unwrap()
    }

    #[test]
    fn test_from_reader() {
        let table = sample_table();
        assert_eq!(table.headers, vec!["text", "Issue"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::from_reader("a,b,c\n1\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", ""]);
    }

    #[test]
    fn test_wide_row_is_rejected() {
        let err = Table::from_reader("a,b,c\n1,2,3\n1,2,3,4\n".as_bytes()).unwrap_err();
        match err {
            AnalyzerError::TooManyFields {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 4);
            }
            other => panic!("Expected TooManyFields, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_fields_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let mut table = Table::new(vec!["text".into(), "amounts".into()]);
        table.rows.push(vec![
            "He said \"no\", twice\nthen left".into(),
            "[\"$10\",\"$20\"]".into(),
        ]);

        table.write_csv(&path).unwrap();
        assert_eq!(Table::read_csv(&path).unwrap(), table);
    }

    #[test]
    fn test_require_columns() {
        let table = sample_table();
        assert_eq!(table.require_columns(&["Issue", "text"]).unwrap(), vec![1, 0]);

        match table.require_columns(&["risk_category", "Issue", "Product"]) {
            Err(AnalyzerError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["Product", "risk_category"]);
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let err = Table::read_csv(Path::new("/nonexistent/input.csv")).unwrap_err();
        assert!(matches!(err, AnalyzerError::FileNotFound(_)));
    }

    #[test]
    fn test_sample_is_seeded_and_ordered() {
        let mut rows = Table::new(vec!["n".into()]);
        rows.rows = (0..50).map(|i| vec![i.to_string()]).collect();

        let mut a = rows.clone();
        let mut b = rows.clone();
        a.sample(10, 42);
        b.sample(10, 42);

        assert_eq!(a.len(), 10);
        assert_eq!(a, b);

        let values: Vec<usize> = a.column(0).map(|v| v.parse().unwrap()).collect();
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(values, sorted);
    }

    #[test]
    fn test_sample_noop_when_small() {
        let mut table = sample_table();
        table.sample(10, 42);
        assert_eq!(table.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_sample_keeps_order_and_size(len in 0usize..200, n in 0usize..250, seed in any::<u64>()) {
            let mut table = Table::new(vec!["n".into()]);
            table.rows = (0..len).map(|i| vec![i.to_string()]).collect();
            table.sample(n, seed);

            prop_assert_eq!(table.len(), len.min(n));
            let values: Vec<usize> = table.column(0).map(|v| v.parse().unwrap()).collect();
            prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

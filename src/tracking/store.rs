//! Flat-file run store
//!
//! ```text
//! <tracking_dir>/<experiment>/<run_id>/meta.json
//!                                      metrics.jsonl
//!                                      params.json
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const META_FILE: &str = "meta.json";
const METRICS_FILE: &str = "metrics.jsonl";
const PARAMS_FILE: &str = "params.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub run_name: String,
    pub parent_run_id: Option<String>,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub key: String,
    pub value: f64,
    pub step: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

pub fn write_meta(run_dir: &Path, meta: &RunMeta) -> io::Result<()> {
    fs::create_dir_all(run_dir)?;
    let writer = BufWriter::new(File::create(run_dir.join(META_FILE))?);
    serde_json::to_writer_pretty(writer, meta)?;
    Ok(())
}

pub fn append_metric(run_dir: &Path, record: &MetricRecord) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(run_dir.join(METRICS_FILE))?;
    let line = serde_json::to_string(record)?;
    writeln!(file, "{}", line)
}

pub fn write_params(run_dir: &Path, params: &BTreeMap<String, String>) -> io::Result<()> {
    let writer = BufWriter::new(File::create(run_dir.join(PARAMS_FILE))?);
    serde_json::to_writer_pretty(writer, params)?;
    Ok(())
}

pub fn read_meta(run_dir: &Path) -> io::Result<RunMeta> {
    let reader = BufReader::new(File::open(run_dir.join(META_FILE))?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_metrics(run_dir: &Path) -> io::Result<Vec<MetricRecord>> {
    let path = run_dir.join(METRICS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

pub fn read_params(run_dir: &Path) -> io::Result<BTreeMap<String, String>> {
    let path = run_dir.join(PARAMS_FILE);
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// All runs of an experiment, oldest first
pub fn list_runs(experiment_dir: &Path) -> io::Result<Vec<RunMeta>> {
    let mut runs = Vec::new();
    for entry in fs::read_dir(experiment_dir)? {
        let path = entry?.path();
        if path.join(META_FILE).is_file() {
            runs.push(read_meta(&path)?);
        }
    }
    runs.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.run_id.cmp(&b.run_id)));
    Ok(runs)
}

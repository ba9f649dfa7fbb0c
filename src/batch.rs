//! Batch CSV analysis
//!
//! Rows are analysed one after another. A row whose call fails or whose
//! response does not validate becomes a failure row in the output; it never
//! aborts the batch.

use crate::analyzer::{analyze_text, ChatModel};
use crate::error::Result;
use crate::table::Table;
use crate::tracking::Tracker;
use complaint_risk_common::{AnalysisOutcome, AnalysisResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{info, warn};

/// Result columns appended to every row
pub const RESULT_COLUMNS: &[&str] = &[
    "summary",
    "risk_category",
    "risk_confidence",
    "customer_entities",
    "company_entities",
    "amounts",
    "dates",
];

/// Appended only when at least one row failed
pub const FAILURE_COLUMNS: &[&str] = &["error", "raw_response"];

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub text_column: String,
    /// Maximum rows to analyse; larger inputs are sampled
    pub limit: usize,
    pub seed: u64,
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            text_column: "text".into(),
            limit: 200,
            seed: 42,
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub failures: usize,
}

enum RowOutcome {
    Parsed(AnalysisResult),
    Failed { error: String, raw: Option<String> },
}

fn result_cells(result: &AnalysisResult) -> Result<Vec<String>> {
    let e = &result.extraction;
    Ok(vec![
        result.summary.clone(),
        result.risk_category.to_string(),
        result.risk_confidence.to_string(),
        serde_json::to_string(&e.customer_entities)?,
        serde_json::to_string(&e.company_entities)?,
        serde_json::to_string(&e.amounts)?,
        serde_json::to_string(&e.dates)?,
    ])
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}") {
        bar.set_style(style);
    }
    bar
}

/// Analyse every row of `input`, returning the scored table
///
/// Rows with an empty text cell are dropped and the remainder is sampled
/// down to `options.limit` before any model call is made.
pub async fn analyze_table<M>(
    model: &M,
    mut input: Table,
    options: &BatchOptions,
    tracker: Option<&Tracker>,
) -> Result<(Table, BatchSummary)>
where
    M: ChatModel + ?Sized,
{
    let text_idx = input.require_columns(&[options.text_column.as_str()])?[0];

    input.retain_rows(|row| !row[text_idx].trim().is_empty());
    input.sample(options.limit, options.seed);

    let mut batch_run = tracker.map(|t| t.start_run("batch_analyze"));
    if let Some(run) = batch_run.as_mut() {
        run.log_param("rows", &input.len().to_string());
    }

    let bar = progress_bar(input.len(), options.show_progress);
    let mut outcomes = Vec::with_capacity(input.len());

    for (i, row) in input.rows.iter().enumerate() {
        let text = &row[text_idx];
        let outcome = match analyze_text(model, text, tracker).await {
            Ok(analysis) => match analysis.outcome {
                AnalysisOutcome::Parsed(result) => RowOutcome::Parsed(result),
                AnalysisOutcome::ParseFailure { error, raw } => RowOutcome::Failed {
                    error,
                    raw: Some(raw),
                },
            },
            Err(e) => RowOutcome::Failed {
                error: e.to_string(),
                raw: None,
            },
        };

        if let RowOutcome::Failed { error, .. } = &outcome {
            warn!(row = i, error = %error, "row analysis failed");
        }
        outcomes.push(outcome);

        if let Some(run) = batch_run.as_ref() {
            run.log_metric("processed", (i + 1) as f64, Some((i + 1) as u64));
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let failures = outcomes
        .iter()
        .filter(|o| matches!(o, RowOutcome::Failed { .. }))
        .count();
    let with_failure_columns = failures > 0;

    // result columns replace same-named input columns
    let replaced: Vec<&str> = RESULT_COLUMNS
        .iter()
        .chain(FAILURE_COLUMNS.iter())
        .copied()
        .collect();
    let kept: Vec<usize> = (0..input.headers.len())
        .filter(|&i| !replaced.contains(&input.headers[i].as_str()))
        .collect();

    let mut headers: Vec<String> = kept.iter().map(|&i| input.headers[i].clone()).collect();
    headers.extend(RESULT_COLUMNS.iter().map(|c| c.to_string()));
    if with_failure_columns {
        headers.extend(FAILURE_COLUMNS.iter().map(|c| c.to_string()));
    }

    let mut output = Table::new(headers);
    for (row, outcome) in input.rows.iter().zip(outcomes) {
        let mut cells: Vec<String> = kept.iter().map(|&i| row[i].clone()).collect();
        match outcome {
            RowOutcome::Parsed(result) => {
                cells.extend(result_cells(&result)?);
                if with_failure_columns {
                    cells.extend([String::new(), String::new()]);
                }
            }
            RowOutcome::Failed { error, raw } => {
                cells.extend(result_cells(&AnalysisResult::default())?);
                cells.push(error);
                cells.push(raw.unwrap_or_default());
            }
        }
        output.rows.push(cells);
    }

    let summary = BatchSummary {
        rows: output.len(),
        failures,
    };

    if let Some(mut run) = batch_run {
        run.log_param("failures", &failures.to_string());
        run.finish();
    }

    Ok((output, summary))
}

/// Read `in_csv`, analyse it and write the scored rows to `out_csv`
pub async fn analyze_csv<M>(
    model: &M,
    in_csv: &Path,
    out_csv: &Path,
    options: &BatchOptions,
    tracker: Option<&Tracker>,
) -> Result<BatchSummary>
where
    M: ChatModel + ?Sized,
{
    let input = Table::read_csv(in_csv)?;
    info!(path = %in_csv.display(), rows = input.len(), "loaded batch input");

    let (output, summary) = analyze_table(model, input, options, tracker).await?;
    output.write_csv(out_csv)?;

    info!(
        path = %out_csv.display(),
        rows = summary.rows,
        failures = summary.failures,
        "saved batch results"
    );
    Ok(summary)
}

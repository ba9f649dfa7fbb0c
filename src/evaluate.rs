//! Evaluation of a scored CSV
//!
//! True labels are derived from the complaint's own `Issue`/`Product` fields
//! via [`coerce_label`]; predictions are the model's `risk_category` column.

use crate::error::Result;
use crate::table::Table;
use complaint_risk_common::{
    classification_report, coerce_label, label_distribution, ClassificationReport,
    ConfusionMatrix, RiskCategory,
};
use std::fmt::Write;
use std::path::Path;

pub const REQUIRED_COLUMNS: &[&str] = &["risk_category", "Issue", "Product"];

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub true_distribution: Vec<(String, usize)>,
    pub pred_distribution: Vec<(String, usize)>,
    pub report: ClassificationReport,
    pub confusion: Option<ConfusionMatrix>,
}

impl EvaluationReport {
    pub fn render(&self, digits: usize) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "True label distribution:");
        write_distribution(&mut out, &self.true_distribution);
        let _ = writeln!(out);
        let _ = writeln!(out, "Predicted label distribution:");
        write_distribution(&mut out, &self.pred_distribution);
        let _ = writeln!(out);

        out.push_str(&self.report.render(digits));

        if let Some(confusion) = &self.confusion {
            let _ = writeln!(out);
            let _ = writeln!(out, "Confusion matrix:");
            out.push_str(&confusion.render());
        }
        out
    }
}

fn write_distribution(out: &mut String, distribution: &[(String, usize)]) {
    let width = distribution.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (label, count) in distribution {
        let _ = writeln!(out, "  {:<width$}  {}", label, count);
    }
}

pub fn evaluate_table(table: &Table, with_confusion: bool) -> Result<EvaluationReport> {
    let idx = table.require_columns(REQUIRED_COLUMNS)?;
    let (pred_idx, issue_idx, product_idx) = (idx[0], idx[1], idx[2]);

    let y_true: Vec<String> = table
        .rows
        .iter()
        .map(|row| coerce_label(&row[issue_idx], &row[product_idx]).to_string())
        .collect();
    let y_pred: Vec<String> = table.column(pred_idx).map(str::to_string).collect();

    let report = classification_report(&y_true, &y_pred)?;
    let confusion = with_confusion
        .then(|| ConfusionMatrix::new(&y_true, &y_pred, &RiskCategory::sorted_names()));

    Ok(EvaluationReport {
        true_distribution: label_distribution(&y_true),
        pred_distribution: label_distribution(&y_pred),
        report,
        confusion,
    })
}

pub fn evaluate_csv(path: &Path, with_confusion: bool) -> Result<EvaluationReport> {
    let table = Table::read_csv(path)?;
    evaluate_table(&table, with_confusion)
}

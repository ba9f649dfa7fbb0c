//! Classification metrics
//!
//! Multi-class precision / recall / F1 over string labels, label
//! distributions and a confusion matrix. Zero denominators yield 0.0.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Scores for one label
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged scores
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-label and aggregate scores
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// Sorted by label
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub total: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Compute a report over the sorted union of true and predicted labels
///
/// # Arguments
/// * `y_true` - reference labels
/// * `y_pred` - predicted labels, same length
pub fn classification_report<S: AsRef<str>>(
    y_true: &[S],
    y_pred: &[S],
) -> Result<ClassificationReport> {
    if y_true.len() != y_pred.len() {
        return Err(Error::Parse(format!(
            "label length mismatch: {} true vs {} predicted",
            y_true.len(),
            y_pred.len()
        )));
    }

    // label -> (tp, fp, fn, support)
    let mut counts: BTreeMap<&str, (usize, usize, usize, usize)> = BTreeMap::new();
    let mut correct = 0;

    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        let (t, p) = (t.as_ref(), p.as_ref());
        counts.entry(t).or_default().3 += 1;
        if t == p {
            correct += 1;
            counts.entry(t).or_default().0 += 1;
        } else {
            counts.entry(p).or_default().1 += 1;
            counts.entry(t).or_default().2 += 1;
        }
    }

    let classes: Vec<ClassMetrics> = counts
        .into_iter()
        .map(|(label, (tp, fp, fn_count, support))| {
            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_count);
            ClassMetrics {
                label: label.to_string(),
                precision,
                recall,
                f1: f1_score(precision, recall),
                support,
            }
        })
        .collect();

    let total = y_true.len();
    let n_classes = classes.len();

    let mut macro_avg = AverageMetrics::default();
    let mut weighted_avg = AverageMetrics::default();
    for c in &classes {
        macro_avg.precision += c.precision;
        macro_avg.recall += c.recall;
        macro_avg.f1 += c.f1;

        let w = c.support as f64;
        weighted_avg.precision += c.precision * w;
        weighted_avg.recall += c.recall * w;
        weighted_avg.f1 += c.f1 * w;
    }
    if n_classes > 0 {
        let n = n_classes as f64;
        macro_avg.precision /= n;
        macro_avg.recall /= n;
        macro_avg.f1 /= n;
    }
    if total > 0 {
        let n = total as f64;
        weighted_avg.precision /= n;
        weighted_avg.recall /= n;
        weighted_avg.f1 /= n;
    }

    Ok(ClassificationReport {
        classes,
        accuracy: ratio(correct, total),
        macro_avg,
        weighted_avg,
        total,
    })
}

impl ClassificationReport {
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }

    /// Render as a fixed-width table
    pub fn render(&self, digits: usize) -> String {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(12);
        let col = (digits + 2).max(9);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>width$} {:>col$} {:>col$} {:>col$} {:>col$}\n",
            "", "precision", "recall", "f1-score", "support"
        );
        for c in &self.classes {
            let _ = writeln!(
                out,
                "{:>width$} {:>col$.digits$} {:>col$.digits$} {:>col$.digits$} {:>col$}",
                c.label, c.precision, c.recall, c.f1, c.support
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>width$} {:>col$} {:>col$} {:>col$.digits$} {:>col$}",
            "accuracy", "", "", self.accuracy, self.total
        );
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            let _ = writeln!(
                out,
                "{:>width$} {:>col$.digits$} {:>col$.digits$} {:>col$.digits$} {:>col$}",
                name, avg.precision, avg.recall, avg.f1, self.total
            );
        }
        out
    }
}

/// Count labels, most frequent first (ties by label)
pub fn label_distribution<S: AsRef<str>>(labels: &[S]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.as_ref()).or_insert(0) += 1;
    }

    let mut distribution: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}

/// Confusion counts, rows = true label, columns = predicted label
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Pairs whose true or predicted label is outside `labels` are ignored
    pub fn new<S: AsRef<str>>(y_true: &[S], y_pred: &[S], labels: &[&str]) -> Self {
        let index: BTreeMap<&str, usize> =
            labels.iter().enumerate().map(|(i, l)| (*l, i)).collect();
        let mut counts = vec![vec![0; labels.len()]; labels.len()];

        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            if let (Some(&i), Some(&j)) = (index.get(t.as_ref()), index.get(p.as_ref())) {
                counts[i][j] += 1;
            }
        }

        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            counts,
        }
    }

    pub fn get(&self, true_label: &str, pred_label: &str) -> usize {
        let i = self.labels.iter().position(|l| l == true_label);
        let j = self.labels.iter().position(|l| l == pred_label);
        match (i, j) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    pub fn render(&self) -> String {
        let width = self.labels.iter().map(|l| l.len()).max().unwrap_or(0).max(4);
        let mut out = String::new();

        let _ = write!(out, "{:>width$}", "true\\pred");
        for label in &self.labels {
            let _ = write!(out, " {:>width$}", label);
        }
        let _ = writeln!(out);

        for (label, row) in self.labels.iter().zip(&self.counts) {
            let _ = write!(out, "{:>width$}", label);
            for count in row {
                let _ = write!(out, " {:>width$}", count);
            }
            let _ = writeln!(out);
        }
        out
    }
}

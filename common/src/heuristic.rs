//! Heuristic ground-truth labels
//!
//! Maps complaint metadata (`Issue` / `Product`) to the risk taxonomy so
//! model predictions can be scored without hand-labelled data.
//! Rules are evaluated in order; the first match wins.

use crate::taxonomy::RiskCategory;

/// Which text a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Lower-cased product field only
    Product,
    /// Lower-cased `"{issue} {product}"`
    Combined,
}

/// One `(predicate, label)` entry of the rule list
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub scope: RuleScope,
    /// At least one of these must occur
    pub any_of: &'static [&'static str],
    /// If non-empty, at least one of these must also occur
    pub also_any_of: &'static [&'static str],
    pub category: RiskCategory,
}

impl LabelRule {
    fn matches(&self, product: &str, combined: &str) -> bool {
        let text = match self.scope {
            RuleScope::Product => product,
            RuleScope::Combined => combined,
        };
        let hit = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));
        hit(self.any_of) && (self.also_any_of.is_empty() || hit(self.also_any_of))
    }
}

const FEE_WORDS: &[&str] = &["fee", "charge", "billing", "overdraft", "interest charge"];

/// Ordered label rules
///
/// Overlaps are resolved by position: product shortcuts before keyword
/// scans, DataPrivacy before Fraud ("identity theft" matches both), Fraud
/// before Fees ("chargeback" contains "charge"), and Billing before Fees
/// when a billing-specific word accompanies a fee word.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        scope: RuleScope::Product,
        any_of: &["credit reporting"],
        also_any_of: &[],
        category: RiskCategory::DataPrivacy,
    },
    LabelRule {
        scope: RuleScope::Product,
        any_of: &["debt collection"],
        also_any_of: &[],
        category: RiskCategory::Collections,
    },
    LabelRule {
        scope: RuleScope::Combined,
        any_of: &["debt"],
        also_any_of: &["collect"],
        category: RiskCategory::Collections,
    },
    LabelRule {
        scope: RuleScope::Combined,
        any_of: &[
            "credit report",
            "incorrect information",
            "privacy",
            "identity theft",
            "data breach",
        ],
        also_any_of: &[],
        category: RiskCategory::DataPrivacy,
    },
    LabelRule {
        scope: RuleScope::Combined,
        any_of: &[
            "fraud",
            "scam",
            "unauthorized",
            "dispute charge",
            "account taken over",
            "chargeback",
        ],
        also_any_of: &[],
        category: RiskCategory::Fraud,
    },
    LabelRule {
        scope: RuleScope::Combined,
        any_of: FEE_WORDS,
        also_any_of: &["billing", "statement"],
        category: RiskCategory::Billing,
    },
    LabelRule {
        scope: RuleScope::Combined,
        any_of: FEE_WORDS,
        also_any_of: &[],
        category: RiskCategory::Fees,
    },
    LabelRule {
        scope: RuleScope::Combined,
        any_of: &[
            "misleading",
            "deceptive",
            "sales practice",
            "sold me",
            "upsell",
            "mis sell",
            "missell",
            "mis-selling",
        ],
        also_any_of: &[],
        category: RiskCategory::MisSelling,
    },
];

/// Derive a label from complaint metadata; `Other` when no rule matches
pub fn coerce_label(issue: &str, product: &str) -> RiskCategory {
    let product = product.to_lowercase();
    let combined = format!("{} {}", issue.to_lowercase(), product);

    LABEL_RULES
        .iter()
        .find(|rule| rule.matches(&product, &combined))
        .map(|rule| rule.category)
        .unwrap_or(RiskCategory::Other)
}

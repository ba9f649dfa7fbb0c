//! Risk category taxonomy
//!
//! The closed 7-value label space shared by the model output and the
//! evaluation heuristic, plus the synonym table used to fold free-form
//! category strings into it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk category assigned to a complaint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Billing,
    Collections,
    DataPrivacy,
    Fees,
    MisSelling,
    Fraud,
    Other,
}

impl RiskCategory {
    /// All categories in prompt order
    pub const ALL: [RiskCategory; 7] = [
        RiskCategory::Billing,
        RiskCategory::Collections,
        RiskCategory::DataPrivacy,
        RiskCategory::Fees,
        RiskCategory::MisSelling,
        RiskCategory::Fraud,
        RiskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Billing => "Billing",
            RiskCategory::Collections => "Collections",
            RiskCategory::DataPrivacy => "DataPrivacy",
            RiskCategory::Fees => "Fees",
            RiskCategory::MisSelling => "MisSelling",
            RiskCategory::Fraud => "Fraud",
            RiskCategory::Other => "Other",
        }
    }

    /// Canonical names sorted alphabetically (evaluation label order)
    pub fn sorted_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the canonical names
impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown risk category: {}", s))
    }
}

/// Synonym table: `(substring, category)`, scanned top-down, first hit wins.
///
/// Multi-word phrases come before single words, and no entry is a substring
/// of an entry listed after it, so specific phrases are never shadowed by
/// generic ones ("credit reporting" resolves before anything else).
pub const CATEGORY_SYNONYMS: &[(&str, RiskCategory)] = &[
    ("credit reporting", RiskCategory::DataPrivacy),
    ("debt collection", RiskCategory::Collections),
    ("data privacy", RiskCategory::DataPrivacy),
    ("mis-selling", RiskCategory::MisSelling),
    ("mis selling", RiskCategory::MisSelling),
    ("misselling", RiskCategory::MisSelling),
    ("dataprivacy", RiskCategory::DataPrivacy),
    ("collections", RiskCategory::Collections),
    ("billing", RiskCategory::Billing),
    ("charges", RiskCategory::Billing),
    ("fees", RiskCategory::Fees),
    ("privacy", RiskCategory::DataPrivacy),
    ("fraud", RiskCategory::Fraud),
    ("scam", RiskCategory::Fraud),
];

/// Fold an arbitrary category string into the taxonomy
///
/// 1. exact canonical name (after trimming) → itself
/// 2. first synonym contained in the lower-cased string
/// 3. `Other`
pub fn normalize_category(value: &str) -> RiskCategory {
    let trimmed = value.trim();
    if let Ok(category) = trimmed.parse::<RiskCategory>() {
        return category;
    }

    let lower = trimmed.to_lowercase();
    CATEGORY_SYNONYMS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(RiskCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_are_identity() {
        for category in RiskCategory::ALL {
            assert_eq!(normalize_category(category.as_str()), category);
        }
    }

    #[test]
    fn test_canonical_name_with_whitespace() {
        assert_eq!(normalize_category("  Fraud \n"), RiskCategory::Fraud);
    }

    #[test]
    fn test_credit_reporting_wins() {
        assert_eq!(normalize_category("Credit Reporting"), RiskCategory::DataPrivacy);
        assert_eq!(
            normalize_category("credit reporting fees and billing"),
            RiskCategory::DataPrivacy
        );
        assert_eq!(
            normalize_category("fraud in credit reporting"),
            RiskCategory::DataPrivacy
        );
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(normalize_category("billing"), RiskCategory::Billing);
        assert_eq!(normalize_category("Unexpected charges"), RiskCategory::Billing);
        assert_eq!(normalize_category("Debt Collection"), RiskCategory::Collections);
        assert_eq!(normalize_category("collections"), RiskCategory::Collections);
        assert_eq!(normalize_category("Mis-selling"), RiskCategory::MisSelling);
        assert_eq!(normalize_category("mis selling"), RiskCategory::MisSelling);
        assert_eq!(normalize_category("Privacy breach"), RiskCategory::DataPrivacy);
        assert_eq!(normalize_category("dataprivacy"), RiskCategory::DataPrivacy);
        assert_eq!(normalize_category("Phone scam"), RiskCategory::Fraud);
        assert_eq!(normalize_category("fees"), RiskCategory::Fees);
    }

    #[test]
    fn test_unknown_defaults_to_other() {
        assert_eq!(normalize_category(""), RiskCategory::Other);
        assert_eq!(normalize_category("customer service"), RiskCategory::Other);
        assert_eq!(normalize_category("other"), RiskCategory::Other);
    }

    #[test]
    fn test_synonym_table_is_not_shadowed() {
        // an earlier keyword contained in a later one would make the later unreachable
        for (i, (earlier, _)) in CATEGORY_SYNONYMS.iter().enumerate() {
            for (later, _) in &CATEGORY_SYNONYMS[i + 1..] {
                assert!(
                    !later.contains(earlier),
                    "'{}' shadows '{}'",
                    earlier,
                    later
                );
            }
        }
    }

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!("Fees".parse::<RiskCategory>(), Ok(RiskCategory::Fees));
        assert!("fees".parse::<RiskCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&RiskCategory::DataPrivacy).unwrap();
        assert_eq!(json, "\"DataPrivacy\"");
        let parsed: RiskCategory = serde_json::from_str("\"MisSelling\"").unwrap();
        assert_eq!(parsed, RiskCategory::MisSelling);
    }

    #[test]
    fn test_sorted_names() {
        assert_eq!(
            RiskCategory::sorted_names(),
            vec!["Billing", "Collections", "DataPrivacy", "Fees", "Fraud", "MisSelling", "Other"]
        );
    }
}

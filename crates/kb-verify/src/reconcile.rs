//! Matching concept references against a chapter's concept names.
//!
//! A reference that is not an exact catalog entry is classified by the first
//! rule that recovers a catalog entry:
//!
//! 1. whitespace: equal after trimming
//! 2. case: equal after trimming and lowercasing
//! 3. unicode: equal after [`normalize`], with or without lowercasing
//!
//! Anything else is missing, with a few subsequence-based lookalikes.

use std::collections::HashMap;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// Lookalikes returned for a missing reference.
pub const MAX_SIMILAR: usize = 3;

/// How a reference relates to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classification {
    Exact,
    Whitespace { correct: String },
    Case { correct: String },
    Unicode { correct: String },
    Missing { suggestions: Vec<String> },
}

impl Classification {
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact)
    }

    /// The catalog entry the reference should have used, when one was found.
    #[must_use]
    pub fn correct_form(&self) -> Option<&str> {
        match self {
            Self::Whitespace { correct } | Self::Case { correct } | Self::Unicode { correct } => {
                Some(correct)
            }
            Self::Exact | Self::Missing { .. } => None,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Whitespace { .. } => "whitespace",
            Self::Case { .. } => "case",
            Self::Unicode { .. } => "unicode",
            Self::Missing { .. } => "missing",
        }
    }
}

/// A chapter's concept names with the lookup tables each rule needs.
#[derive(Debug, Clone, Default)]
pub struct NameCatalog {
    names: Vec<String>,
    trimmed: HashMap<String, usize>,
    lower: HashMap<String, usize>,
    normalized: HashMap<String, usize>,
    normalized_lower: HashMap<String, usize>,
}

impl NameCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for name in names {
            let name = name.into();
            if catalog.names.contains(&name) {
                continue;
            }
            let index = catalog.names.len();
            let trimmed = name.trim();
            let normalized = normalize(&name);
            catalog.trimmed.entry(trimmed.to_string()).or_insert(index);
            catalog.lower.entry(trimmed.to_lowercase()).or_insert(index);
            catalog
                .normalized_lower
                .entry(normalized.to_lowercase())
                .or_insert(index);
            catalog.normalized.entry(normalized).or_insert(index);
            catalog.names.push(name);
        }
        catalog
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn classify(&self, reference: &str) -> Classification {
        if self.contains(reference) {
            return Classification::Exact;
        }
        let trimmed = reference.trim();
        if let Some(correct) = self.lookup(&self.trimmed, trimmed) {
            return Classification::Whitespace { correct };
        }
        if let Some(correct) = self.lookup(&self.lower, &trimmed.to_lowercase()) {
            return Classification::Case { correct };
        }
        let normalized = normalize(reference);
        if let Some(correct) = self
            .lookup(&self.normalized, &normalized)
            .or_else(|| self.lookup(&self.normalized_lower, &normalized.to_lowercase()))
        {
            return Classification::Unicode { correct };
        }
        Classification::Missing {
            suggestions: self.similar(reference),
        }
    }

    /// Catalog names where either string is a case-insensitive subsequence
    /// of the other. Sorted, at most [`MAX_SIMILAR`].
    #[must_use]
    pub fn similar(&self, reference: &str) -> Vec<String> {
        let mut found: Vec<String> = self
            .names
            .iter()
            .filter(|name| is_subsequence(reference, name) || is_subsequence(name, reference))
            .cloned()
            .collect();
        found.sort();
        found.truncate(MAX_SIMILAR);
        found
    }

    fn lookup(&self, table: &HashMap<String, usize>, key: &str) -> Option<String> {
        table.get(key).map(|&index| self.names[index].clone())
    }
}

/// NFKC, then every whitespace character becomes a space, runs collapse,
/// and the ends are trimmed.
#[must_use]
pub fn normalize(value: &str) -> String {
    let folded: String = value
        .nfkc()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the characters of `shorter` appear in order within `longer`,
/// ignoring case.
#[must_use]
pub fn is_subsequence(shorter: &str, longer: &str) -> bool {
    let longer = longer.to_lowercase();
    let mut rest = longer.chars();
    shorter
        .to_lowercase()
        .chars()
        .all(|wanted| rest.any(|c| c == wanted))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn fractions() -> NameCatalog {
        NameCatalog::new(["Fractions", "Like Fractions", "Decimals"])
    }

    #[test]
    fn exact_names_pass() {
        assert_eq!(fractions().classify("Fractions"), Classification::Exact);
    }

    #[test]
    fn trailing_space_is_whitespace() {
        assert_eq!(
            fractions().classify("Fractions "),
            Classification::Whitespace {
                correct: "Fractions".into()
            }
        );
    }

    #[test]
    fn lowercase_is_case() {
        assert_eq!(
            fractions().classify("fractions"),
            Classification::Case {
                correct: "Fractions".into()
            }
        );
        assert_eq!(
            fractions().classify("  DECIMALS"),
            Classification::Case {
                correct: "Decimals".into()
            }
        );
    }

    #[rstest]
    #[case("Like\u{3000}Fractions")]
    #[case("Like\u{a0}Fractions")]
    #[case("Like  Fractions")]
    #[case("like\u{2009}fractions")]
    #[case("Ｌｉｋｅ Fractions")]
    fn unicode_variants(#[case] reference: &str) {
        assert_eq!(
            fractions().classify(reference),
            Classification::Unicode {
                correct: "Like Fractions".into()
            }
        );
    }

    #[test]
    fn unrelated_name_is_missing_without_suggestions() {
        let catalog = NameCatalog::new(["Decimals", "Whole Numbers"]);
        assert_eq!(
            catalog.classify("Ratios"),
            Classification::Missing {
                suggestions: vec![]
            }
        );
    }

    #[test]
    fn missing_name_lists_subsequence_lookalikes() {
        let catalog = NameCatalog::new([
            "Fractions on Number Line",
            "Equivalent Fractions",
            "Fraction",
            "Like Fractions",
            "Decimals",
        ]);
        assert_eq!(
            catalog.classify("Fractions"),
            Classification::Missing {
                suggestions: vec![
                    "Equivalent Fractions".into(),
                    "Fraction".into(),
                    "Fractions on Number Line".into(),
                ]
            }
        );
    }

    #[rstest]
    #[case("ace", "abcde", true)]
    #[case("ACE", "abcde", true)]
    #[case("aec", "abcde", false)]
    #[case("", "abc", true)]
    #[case("abcd", "abc", false)]
    fn subsequence(#[case] shorter: &str, #[case] longer: &str, #[case] expected: bool) {
        assert_eq!(is_subsequence(shorter, longer), expected);
    }

    #[test]
    fn normalize_collapses_whitespace_classes() {
        assert_eq!(normalize(" a\t\u{3000}b \n"), "a b");
        assert_eq!(normalize("ﬁle"), "file");
    }

    #[test]
    fn correct_form_and_labels() {
        let catalog = fractions();
        let case = catalog.classify("decimals");
        assert_eq!(case.correct_form(), Some("Decimals"));
        assert_eq!(case.label(), "case");
        assert_eq!(catalog.classify("Ratios").correct_form(), None);
    }
}

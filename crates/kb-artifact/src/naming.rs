//! Chapter file naming.
//!
//! A chapter's artifacts share a prefix `NN_slug`: the two-digit chapter
//! position and the snake-case chapter name.

use std::path::Path;

use kb_core::enums::QuestionKind;

pub const CONCEPTS_SUFFIX: &str = "_concepts.csv";

/// What a file in a chapter directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Concepts,
    Questions(QuestionKind),
}

/// Lowercase, non-alphanumerics to `_`, repeats collapsed, edges trimmed.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

#[must_use]
pub fn chapter_prefix(position: i64, name: &str) -> String {
    format!("{position:02}_{}", slugify(name))
}

#[must_use]
pub fn concepts_file_name(prefix: &str) -> String {
    format!("{prefix}{CONCEPTS_SUFFIX}")
}

#[must_use]
pub fn questions_file_name(prefix: &str, kind: QuestionKind) -> String {
    format!("{prefix}_{}.json", kind.file_suffix())
}

/// Split a file name into its chapter prefix and artifact kind.
#[must_use]
pub fn classify_file_name(file_name: &str) -> Option<(&str, ArtifactKind)> {
    if let Some(prefix) = file_name.strip_suffix(CONCEPTS_SUFFIX) {
        return Some((prefix, ArtifactKind::Concepts));
    }
    QuestionKind::ALL.into_iter().find_map(|kind| {
        file_name
            .strip_suffix(".json")
            .and_then(|stem| stem.strip_suffix(kind.file_suffix()))
            .and_then(|stem| stem.strip_suffix('_'))
            .map(|prefix| (prefix, ArtifactKind::Questions(kind)))
    })
}

/// The leading run of digits of a name followed by `_`, e.g. `7` for `07_ratios`.
#[must_use]
pub fn leading_number(name: &str) -> Option<i64> {
    let digits = name.len() - name.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 || !name[digits..].starts_with('_') {
        return None;
    }
    name[..digits].parse().ok()
}

pub(crate) fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

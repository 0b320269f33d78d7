//! Enums shared across kbase crates.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// QuestionKind
// ---------------------------------------------------------------------------

/// The two question banks extracted per chapter.
///
/// Ordered exercise first, matching [`QuestionKind::ALL`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Exercise,
    SolvedExample,
}

impl QuestionKind {
    pub const ALL: [Self; 2] = [Self::Exercise, Self::SolvedExample];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SolvedExample => "solved_example",
            Self::Exercise => "exercise",
        }
    }

    /// Key of the question list inside a bank file.
    #[must_use]
    pub const fn bank_key(self) -> &'static str {
        match self {
            Self::SolvedExample => "solved_examples_questions",
            Self::Exercise => "exercise_questions",
        }
    }

    /// File name suffix (before `.json`) for the bank of this kind.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::SolvedExample => "solved_examples",
            Self::Exercise => "exercise_questions",
        }
    }

    #[must_use]
    pub const fn is_solved_example(self) -> bool {
        matches!(self, Self::SolvedExample)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

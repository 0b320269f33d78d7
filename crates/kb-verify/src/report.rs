//! Verification results. Failures found by a check are data, not errors.

use std::fmt;

use kb_core::enums::QuestionKind;
use serde::Serialize;

use crate::reconcile::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Chapters,
    Concepts,
    Conventions,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chapters => "chapters",
            Self::Concepts => "concepts",
            Self::Conventions => "conventions",
        })
    }
}

/// Which question banks reference a concept name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    Exercise,
    Solved,
    Both,
}

impl ReferenceSource {
    #[must_use]
    pub const fn of(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Exercise => Self::Exercise,
            QuestionKind::SolvedExample => Self::Solved,
        }
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self == other { self } else { Self::Both }
    }

    #[must_use]
    pub const fn includes(self, kind: QuestionKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _)
                | (Self::Exercise, QuestionKind::Exercise)
                | (Self::Solved, QuestionKind::SolvedExample)
        )
    }
}

impl fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exercise => "exercise",
            Self::Solved => "solved",
            Self::Both => "both",
        })
    }
}

/// A replacement proposed for one question that used a missing name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub kind: QuestionKind,
    /// 1-based position of the question in its bank.
    pub question_index: usize,
    pub question_text: String,
    pub suggested: Option<String>,
}

/// A concept name referenced by questions that is not an exact catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptIssue {
    pub name: String,
    pub source: ReferenceSource,
    #[serde(flatten)]
    pub classification: Classification,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub proposals: Vec<Proposal>,
}

impl ConceptIssue {
    #[must_use]
    pub fn describe(&self) -> String {
        let head = format!(
            "[{}] {}: '{}'",
            self.source,
            self.classification.label(),
            self.name
        );
        match &self.classification {
            Classification::Missing { suggestions } if !suggestions.is_empty() => {
                format!("{head} (similar: {})", suggestions.join(", "))
            }
            other => match other.correct_form() {
                Some(correct) => format!("{head} -> '{correct}'"),
                None => head,
            },
        }
    }
}

/// One chapter's result under one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterOutcome {
    pub prefix: String,
    pub passed: bool,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<ConceptIssue>,
}

impl ChapterOutcome {
    pub(crate) fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            passed: true,
            issues: Vec::new(),
            concepts: Vec::new(),
        }
    }

    pub(crate) fn fail(&mut self, issue: impl Into<String>) {
        self.passed = false;
        self.issues.push(issue.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub check: Check,
    pub passed: usize,
    pub failed: usize,
    pub chapters: Vec<ChapterOutcome>,
}

impl CheckReport {
    #[must_use]
    pub fn from_outcomes(check: Check, chapters: Vec<ChapterOutcome>) -> Self {
        let passed = chapters.iter().filter(|c| c.passed).count();
        let report = Self {
            check,
            passed,
            failed: chapters.len() - passed,
            chapters,
        };
        report.log();
        report
    }

    #[must_use]
    pub fn failures(&self) -> impl Iterator<Item = &ChapterOutcome> {
        self.chapters.iter().filter(|c| !c.passed)
    }

    fn log(&self) {
        for chapter in self.failures() {
            for issue in &chapter.issues {
                tracing::warn!(check = %self.check, chapter = %chapter.prefix, "{issue}");
            }
        }
        if self.failed > 0 {
            tracing::error!(check = %self.check, passed = self.passed, failed = self.failed, "check failed");
        } else {
            tracing::info!(check = %self.check, passed = self.passed, "check passed");
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub checks: Vec<CheckReport>,
}

impl VerifyReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.failed > 0)
    }

    #[must_use]
    pub fn check(&self, check: Check) -> Option<&CheckReport> {
        self.checks.iter().find(|c| c.check == check)
    }
}

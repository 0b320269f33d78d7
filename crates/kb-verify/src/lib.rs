//! # kb-verify
//!
//! Pre-sync checks over a directory of chapter artifacts:
//!
//! - **chapters**: every concept table row names the same chapter, and the
//!   question banks agree with it on chapter name and id
//! - **concepts**: every concept name a question references exists in the
//!   chapter's concept table, with near misses classified by [`reconcile`]
//! - **conventions**: numbered file prefixes that match the recorded chapter
//!   position, and a complete set of files per chapter
//!
//! Checks are independent. A failing chapter is reported, never raised.

pub mod checks;
pub mod error;
pub mod reconcile;
pub mod report;
pub mod suggest;

use std::path::Path;
use std::sync::Arc;

use kb_ai::ConceptSuggester;
use kb_artifact::discover;

pub use error::VerifyError;
pub use reconcile::{Classification, NameCatalog};
pub use report::{
    ChapterOutcome, Check, CheckReport, ConceptIssue, Proposal, ReferenceSource, VerifyReport,
};

use crate::checks::concepts::{check_concepts, plan_suggestions};
use crate::checks::{chapters::check_chapters, conventions::check_conventions};
use crate::suggest::fill_suggestions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    pub check_chapters: bool,
    pub check_concepts: bool,
    pub check_conventions: bool,
    /// Ask the suggester for replacements of missing concept names.
    pub suggest: bool,
    /// Suggestion requests in flight at once.
    pub concurrency: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            check_chapters: false,
            check_concepts: false,
            check_conventions: false,
            suggest: false,
            concurrency: 3,
        }
    }
}

impl VerifyOptions {
    /// All three checks, no suggestions.
    #[must_use]
    pub fn all() -> Self {
        Self {
            check_chapters: true,
            check_concepts: true,
            check_conventions: true,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Rejects a run with no checks, or suggestions without the concept check.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if !(self.check_chapters || self.check_concepts || self.check_conventions) {
            return Err(VerifyError::NoCheckRequested);
        }
        if self.suggest && !self.check_concepts {
            return Err(VerifyError::SuggestWithoutConceptCheck);
        }
        Ok(())
    }
}

pub struct Verifier {
    options: VerifyOptions,
    suggester: Option<Arc<dyn ConceptSuggester>>,
}

impl Verifier {
    /// # Errors
    ///
    /// See [`VerifyOptions::validate`].
    pub fn new(options: VerifyOptions) -> Result<Self, VerifyError> {
        options.validate()?;
        Ok(Self {
            options,
            suggester: None,
        })
    }

    #[must_use]
    pub fn with_suggester(mut self, suggester: Arc<dyn ConceptSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Run the selected checks over `dir`.
    ///
    /// # Errors
    ///
    /// Fails before any check runs when the directory cannot be listed, holds
    /// no concept tables, or suggestions were requested without a suggester.
    pub async fn run(&self, dir: &Path) -> Result<VerifyReport, VerifyError> {
        let suggester = match (self.options.suggest, &self.suggester) {
            (true, None) => return Err(VerifyError::SuggesterMissing),
            (true, Some(suggester)) => Some(Arc::clone(suggester)),
            (false, _) => None,
        };

        let groups = discover(dir)?;
        if !groups.iter().any(|g| g.concepts.is_some()) {
            return Err(VerifyError::NoConceptTables {
                dir: dir.to_path_buf(),
            });
        }
        tracing::info!(dir = %dir.display(), chapters = groups.len(), "verifying");

        let mut report = VerifyReport::default();
        if self.options.check_chapters {
            report.checks.push(check_chapters(&groups));
        }
        if self.options.check_concepts {
            let mut findings = check_concepts(&groups);
            if let Some(suggester) = suggester {
                let jobs = plan_suggestions(&mut findings);
                fill_suggestions(suggester, &mut findings, jobs, self.options.concurrency).await;
            }
            let outcomes = findings.into_iter().map(|f| f.outcome).collect();
            report
                .checks
                .push(CheckReport::from_outcomes(Check::Concepts, outcomes));
        }
        if self.options.check_conventions {
            report.checks.push(check_conventions(&groups));
        }
        Ok(report)
    }
}

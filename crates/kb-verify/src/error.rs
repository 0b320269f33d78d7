use std::path::PathBuf;

use kb_artifact::ArtifactError;

/// Problems that stop a verification run before any check executes.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// None of the checks was selected.
    #[error("no check requested; enable at least one of chapters, concepts, conventions")]
    NoCheckRequested,

    /// Suggestions only make sense on top of the concept check.
    #[error("suggestions require the concept check")]
    SuggestWithoutConceptCheck,

    /// Suggestions were requested but no suggester was supplied.
    #[error("suggestions requested but no suggester is configured")]
    SuggesterMissing,

    /// The directory holds no concept tables to check against.
    #[error("no concept tables found in {}", .dir.display())]
    NoConceptTables { dir: PathBuf },

    /// The input directory could not be listed.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

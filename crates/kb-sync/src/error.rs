use kb_artifact::ArtifactError;
use kb_core::enums::QuestionKind;
use kb_core::ids::Id;
use kb_store::StoreError;

/// Why one chapter unit failed to sync.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{prefix}: no {kind} question file")]
    MissingArtifact { prefix: String, kind: QuestionKind },

    #[error("subject mismatch: artifact belongs to {found}, run is for {expected}")]
    SubjectMismatch { expected: Id, found: Id },

    #[error("expected a {expected} bank, file holds {found}")]
    KindMismatch {
        expected: QuestionKind,
        found: QuestionKind,
    },

    #[error("questions written but concept links failed: {0}")]
    LinksFailed(#[source] StoreError),

    #[error("failed to encode question record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

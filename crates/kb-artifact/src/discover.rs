//! Group a directory's artifacts by chapter prefix.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kb_core::enums::QuestionKind;

use crate::error::ArtifactError;
use crate::naming::{self, ArtifactKind};

/// The artifacts found for one chapter prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterFiles {
    pub prefix: String,
    pub concepts: Option<PathBuf>,
    pub exercise: Option<PathBuf>,
    pub solved: Option<PathBuf>,
}

impl ChapterFiles {
    #[must_use]
    pub fn questions(&self, kind: QuestionKind) -> Option<&Path> {
        match kind {
            QuestionKind::Exercise => self.exercise.as_deref(),
            QuestionKind::SolvedExample => self.solved.as_deref(),
        }
    }

    #[must_use]
    pub fn has_questions(&self) -> bool {
        self.exercise.is_some() || self.solved.is_some()
    }
}

/// Scan `dir` (non-recursive) and group recognised files by prefix.
///
/// Files matching no known suffix are ignored. The result is sorted by prefix.
///
/// # Errors
///
/// Returns [`ArtifactError::Io`] when the directory cannot be listed.
pub fn discover(dir: &Path) -> Result<Vec<ChapterFiles>, ArtifactError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ArtifactError::io(dir, e))?;
    let mut chapters: BTreeMap<String, ChapterFiles> = BTreeMap::new();

    for entry in entries {
        let path = entry.map_err(|e| ArtifactError::io(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let Some((prefix, kind)) = naming::file_name(&path).and_then(naming::classify_file_name)
        else {
            continue;
        };

        let slot = chapters
            .entry(prefix.to_string())
            .or_insert_with(|| ChapterFiles {
                prefix: prefix.to_string(),
                ..ChapterFiles::default()
            });
        match kind {
            ArtifactKind::Concepts => slot.concepts = Some(path),
            ArtifactKind::Questions(QuestionKind::Exercise) => slot.exercise = Some(path),
            ArtifactKind::Questions(QuestionKind::SolvedExample) => slot.solved = Some(path),
        }
    }

    Ok(chapters.into_values().collect())
}

//! # kb-artifact
//!
//! The on-disk form of a chapter: a concept table (CSV) and up to two
//! question banks (JSON), all sharing a `NN_slug` file prefix. Reading,
//! writing, directory discovery, and migration of files written before ids
//! were embedded.

pub mod concepts;
pub mod discover;
pub mod error;
pub mod migrate;
pub mod naming;
pub mod questions;

use std::path::Path;

pub use concepts::{
    ChapterHeader, ConceptEntry, ConceptRow, ConceptTable, TopicEntry, read_concept_rows,
    read_concept_table, write_concept_table,
};
pub use discover::{ChapterFiles, discover};
pub use error::ArtifactError;
pub use migrate::{MigrationStats, migrate_directory};
pub use questions::{QuestionBank, read_question_bank, write_question_bank};

pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| ArtifactError::io(path, e))
}

//! Concept table upload.

use std::path::Path;

use kb_artifact::read_concept_table;
use kb_core::ids::Id;
use kb_store::{KbService, Table};

use crate::error::SyncError;
use crate::stats::ChapterStats;

/// Upsert a chapter's row, then its topics, then its concepts. A concept
/// listed twice under one topic is written once and counted in
/// `stats.duplicates`.
///
/// # Errors
///
/// Fails when the table cannot be read, belongs to another subject, or a
/// write fails. Counts for writes that succeeded stay in `stats`.
pub async fn upload_concept_table(
    service: &KbService,
    subject_id: &Id,
    path: &Path,
    stats: &mut ChapterStats,
) -> Result<(), SyncError> {
    let table = read_concept_table(path)?;
    if table.subject_id != *subject_id {
        return Err(SyncError::SubjectMismatch {
            expected: *subject_id,
            found: table.subject_id,
        });
    }

    let (chapter, topics, concepts) = table.records();
    stats.duplicates = table.concept_count() - concepts.len();
    if stats.duplicates > 0 {
        tracing::warn!(
            chapter = %chapter.name,
            duplicates = stats.duplicates,
            "dropped repeated concept rows"
        );
    }

    let n = service.upsert_chapter(&chapter).await?;
    stats.record_table(Table::Chapters.as_str(), 1, n);

    let n = service.upsert_topics(&topics).await?;
    stats.record_table(Table::Topics.as_str(), topics.len(), n);

    let n = service.upsert_concepts(&concepts).await?;
    stats.record_table(Table::Concepts.as_str(), concepts.len(), n);

    tracing::info!(
        chapter = %chapter.name,
        topics = topics.len(),
        concepts = concepts.len(),
        "uploaded concept table"
    );
    Ok(())
}

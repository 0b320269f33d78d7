//! Bring artifacts written before ids existed up to the identified format.

use std::collections::HashMap;
use std::path::Path;

use kb_core::enums::QuestionKind;
use kb_core::ids::{self, Id};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::concepts::{self, ConceptRow};
use crate::error::ArtifactError;
use crate::naming::{self, ArtifactKind};
use crate::questions::{self, BankHeader};

const LEGACY_REQUIRED: [&str; 3] = ["concept_name", "topic_name", "chapter_name"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyRow {
    concept_name: String,
    concept_description: String,
    concept_page_number: String,
    topic_name: String,
    topic_description: String,
    topic_position: String,
    chapter_name: String,
    chapter_description: String,
    chapter_position: String,
}

/// Outcome of a directory migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationStats {
    pub concept_files: usize,
    pub exercise_files: usize,
    pub solved_files: usize,
    pub total_concepts: usize,
    pub total_questions: usize,
    /// CSV or JSON files whose names match no known artifact.
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl MigrationStats {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Add ids to a concept table. Cell values other than ids pass through untouched.
///
/// Returns the number of concept rows written.
///
/// # Errors
///
/// Fails on I/O errors, a missing required column, or an empty table.
pub fn migrate_concept_table(
    input: &Path,
    output: &Path,
    subject_id: &Id,
) -> Result<usize, ArtifactError> {
    let mut reader = concepts::open_csv(input)?;
    concepts::require_columns(input, &mut reader, &LEGACY_REQUIRED)?;
    if reader.headers()?.iter().any(|h| h.trim() == "concept_id") {
        tracing::warn!(path = %input.display(), "concept table already carries ids; regenerating");
    }

    let legacy = reader
        .deserialize()
        .collect::<Result<Vec<LegacyRow>, _>>()?;
    if legacy.is_empty() {
        return Err(ArtifactError::decode(input, "concept table has no rows"));
    }

    let mut chapter_ids: HashMap<String, Id> = HashMap::new();
    let mut topic_ids: HashMap<String, Id> = HashMap::new();
    let rows: Vec<ConceptRow> = legacy
        .into_iter()
        .map(|row| {
            let chapter_id = *chapter_ids
                .entry(row.chapter_name.clone())
                .or_insert_with(|| ids::chapter_id(subject_id, &row.chapter_name));
            let topic_id = *topic_ids
                .entry(format!("{chapter_id}:{}", row.topic_name))
                .or_insert_with(|| ids::topic_id(&chapter_id, &row.topic_name));

            ConceptRow {
                concept_id: ids::concept_id(&topic_id, &row.concept_name).to_string(),
                concept_name: row.concept_name,
                concept_description: row.concept_description,
                concept_page_number: row.concept_page_number,
                topic_id: topic_id.to_string(),
                topic_name: row.topic_name,
                topic_description: row.topic_description,
                topic_position: row.topic_position,
                chapter_id: chapter_id.to_string(),
                chapter_name: row.chapter_name,
                chapter_description: row.chapter_description,
                chapter_position: row.chapter_position,
                subject_id: subject_id.to_string(),
            }
        })
        .collect();

    concepts::write_rows(output, &rows)?;
    tracing::info!(
        path = %output.display(),
        concepts = rows.len(),
        topics = topic_ids.len(),
        chapters = chapter_ids.len(),
        "migrated concept table"
    );
    Ok(rows.len())
}

/// Add chapter, subject, and question ids to a question bank.
///
/// Questions are carried as raw JSON objects so fields this crate does not
/// model survive the rewrite. Returns the number of questions written.
///
/// # Errors
///
/// Fails on I/O or JSON errors, a missing chapter name, or a bank whose list
/// key does not match `expected`.
pub fn migrate_question_bank(
    input: &Path,
    output: &Path,
    subject_id: &Id,
    expected: QuestionKind,
) -> Result<usize, ArtifactError> {
    let (header, kind, mut questions) = questions::read_bank_file::<Map<String, Value>>(input)?;
    if kind != expected {
        return Err(ArtifactError::decode(
            input,
            format!("expected a {expected} bank, found {kind}"),
        ));
    }
    if header.chapter_name.trim().is_empty() {
        return Err(ArtifactError::decode(input, "missing chapter_name"));
    }
    if header.chapter_id.is_some() {
        tracing::warn!(path = %input.display(), "question bank already carries ids; regenerating");
    }

    for question in &mut questions {
        let text = question.get("question_text").and_then(Value::as_str);
        let explanation = question.get("explanation").and_then(Value::as_str);
        let id = ids::question_id(subject_id, text, explanation);
        question.insert("id".to_string(), Value::String(id.to_string()));
    }

    let header = BankHeader {
        chapter_id: Some(ids::chapter_id(subject_id, &header.chapter_name)),
        subject_id: Some(*subject_id),
        chapter_name: header.chapter_name,
    };
    let bytes = questions::encode_bank(&header, kind, &questions)?;
    crate::write_file(output, &bytes)?;
    tracing::info!(path = %output.display(), questions = questions.len(), %kind, "migrated question bank");
    Ok(questions.len())
}

/// Migrate every artifact directly inside `input` into `output`.
///
/// A file that fails is recorded in [`MigrationStats::errors`] and the pass
/// continues with the next one.
///
/// # Errors
///
/// Fails only when `input` cannot be listed or `output` cannot be created.
pub fn migrate_directory(
    input: &Path,
    output: &Path,
    subject_id: &Id,
) -> Result<MigrationStats, ArtifactError> {
    let mut files: Vec<_> = std::fs::read_dir(input)
        .map_err(|e| ArtifactError::io(input, e))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    std::fs::create_dir_all(output).map_err(|e| ArtifactError::io(output, e))?;

    let mut stats = MigrationStats::default();
    for path in files {
        let Some(name) = naming::file_name(&path) else {
            continue;
        };
        let is_artifact_ext = path
            .extension()
            .is_some_and(|ext| ext == "csv" || ext == "json");
        let Some((_, kind)) = naming::classify_file_name(name) else {
            if is_artifact_ext {
                tracing::debug!(file = name, "skipping unrecognised file");
                stats.skipped += 1;
            }
            continue;
        };

        let target = output.join(name);
        let result = match kind {
            ArtifactKind::Concepts => {
                migrate_concept_table(&path, &target, subject_id).map(|n| {
                    stats.concept_files += 1;
                    stats.total_concepts += n;
                })
            }
            ArtifactKind::Questions(kind) => {
                migrate_question_bank(&path, &target, subject_id, kind).map(|n| {
                    match kind {
                        QuestionKind::Exercise => stats.exercise_files += 1,
                        QuestionKind::SolvedExample => stats.solved_files += 1,
                    }
                    stats.total_questions += n;
                })
            }
        };

        if let Err(error) = result {
            tracing::error!(file = name, %error, "migration failed");
            stats.errors.push(format!("{name}: {error}"));
        }
    }

    tracing::info!(
        concept_files = stats.concept_files,
        exercise_files = stats.exercise_files,
        solved_files = stats.solved_files,
        errors = stats.errors.len(),
        "migration complete"
    );
    Ok(stats)
}

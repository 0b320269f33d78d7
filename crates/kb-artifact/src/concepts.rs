//! Concept tables: one CSV per chapter, one row per concept.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use kb_core::entities::{
    Chapter, ChapterRecord, Concept, ConceptRecord, Topic, TopicRecord,
};
use kb_core::ids::{self, Id};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Column order of an identified concept table.
pub const HEADERS: [&str; 13] = [
    "concept_id",
    "concept_name",
    "concept_description",
    "concept_page_number",
    "topic_id",
    "topic_name",
    "topic_description",
    "topic_position",
    "chapter_id",
    "chapter_name",
    "chapter_description",
    "chapter_position",
    "subject_id",
];

const REQUIRED: [&str; 7] = [
    "concept_id",
    "concept_name",
    "topic_id",
    "topic_name",
    "chapter_id",
    "chapter_name",
    "subject_id",
];

/// A concept table row exactly as it appears on disk.
///
/// Field order matches [`HEADERS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptRow {
    pub concept_id: String,
    pub concept_name: String,
    pub concept_description: String,
    pub concept_page_number: String,
    pub topic_id: String,
    pub topic_name: String,
    pub topic_description: String,
    pub topic_position: String,
    pub chapter_id: String,
    pub chapter_name: String,
    pub chapter_description: String,
    pub chapter_position: String,
    pub subject_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterHeader {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptEntry {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub page_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub position: i64,
    pub concepts: Vec<ConceptEntry>,
}

/// A decoded concept table, grouped by topic in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptTable {
    pub subject_id: Id,
    pub chapter: ChapterHeader,
    pub topics: Vec<TopicEntry>,
}

impl ConceptTable {
    /// Decode raw rows. The chapter header and subject come from the first row.
    ///
    /// # Errors
    ///
    /// Fails on an empty table or any blank or malformed id.
    pub fn from_rows(path: &Path, rows: &[ConceptRow]) -> Result<Self, ArtifactError> {
        let Some(first) = rows.first() else {
            return Err(ArtifactError::decode(path, "concept table has no rows"));
        };

        let subject_id = parse_id(path, 0, "subject_id", &first.subject_id)?;
        let chapter = ChapterHeader {
            id: parse_id(path, 0, "chapter_id", &first.chapter_id)?,
            name: first.chapter_name.clone(),
            description: first.chapter_description.clone(),
            position: parse_int(&first.chapter_position),
        };

        let mut topics: Vec<TopicEntry> = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let topic_id = parse_id(path, index, "topic_id", &row.topic_id)?;
            let concept = ConceptEntry {
                id: parse_id(path, index, "concept_id", &row.concept_id)?,
                name: row.concept_name.clone(),
                description: row.concept_description.clone(),
                page_number: parse_int(&row.concept_page_number),
            };

            if let Some(topic) = topics.iter_mut().find(|t| t.id == topic_id) {
                topic.concepts.push(concept);
            } else {
                topics.push(TopicEntry {
                    id: topic_id,
                    name: row.topic_name.clone(),
                    description: row.topic_description.clone(),
                    position: parse_int(&row.topic_position),
                    concepts: vec![concept],
                });
            }
        }

        Ok(Self {
            subject_id,
            chapter,
            topics,
        })
    }

    /// The content tree, ids dropped.
    #[must_use]
    pub fn to_tree(&self) -> Chapter {
        Chapter {
            name: self.chapter.name.clone(),
            description: self.chapter.description.clone(),
            topics: self
                .topics
                .iter()
                .map(|topic| Topic {
                    name: topic.name.clone(),
                    description: topic.description.clone(),
                    position: topic.position,
                    concepts: topic
                        .concepts
                        .iter()
                        .map(|concept| Concept {
                            name: concept.name.clone(),
                            description: concept.description.clone(),
                            page_number: concept.page_number,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn concept_names(&self) -> impl Iterator<Item = &str> {
        self.topics
            .iter()
            .flat_map(|topic| topic.concepts.iter().map(|c| c.name.as_str()))
    }

    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.topics.iter().map(|topic| topic.concepts.len()).sum()
    }

    /// Store rows for the chapter, its topics, and its concepts.
    ///
    /// A concept repeated under one topic shares its id; only the first
    /// occurrence is returned.
    #[must_use]
    pub fn records(&self) -> (ChapterRecord, Vec<TopicRecord>, Vec<ConceptRecord>) {
        let chapter = ChapterRecord {
            id: self.chapter.id,
            name: self.chapter.name.clone(),
            description: self.chapter.description.clone(),
            subject_id: self.subject_id,
            position: self.chapter.position,
        };
        let topics = self
            .topics
            .iter()
            .map(|topic| TopicRecord {
                id: topic.id,
                name: topic.name.clone(),
                description: topic.description.clone(),
                chapter_id: self.chapter.id,
                position: topic.position,
            })
            .collect();
        let mut seen = HashSet::new();
        let concepts = self
            .topics
            .iter()
            .flat_map(|topic| {
                topic.concepts.iter().map(|concept| ConceptRecord {
                    id: concept.id,
                    name: concept.name.clone(),
                    description: concept.description.clone(),
                    topic_id: topic.id,
                    page_number: concept.page_number,
                })
            })
            .filter(|record| seen.insert(record.id))
            .collect();
        (chapter, topics, concepts)
    }
}

/// Flatten a chapter tree into identified rows.
#[must_use]
pub fn rows_for_tree(chapter: &Chapter, subject_id: &Id, position: i64) -> Vec<ConceptRow> {
    let chapter_id = ids::chapter_id(subject_id, &chapter.name);
    let mut rows = Vec::new();
    for topic in &chapter.topics {
        let topic_id = ids::topic_id(&chapter_id, &topic.name);
        for concept in &topic.concepts {
            rows.push(ConceptRow {
                concept_id: ids::concept_id(&topic_id, &concept.name).to_string(),
                concept_name: concept.name.clone(),
                concept_description: concept.description.clone(),
                concept_page_number: concept.page_number.to_string(),
                topic_id: topic_id.to_string(),
                topic_name: topic.name.clone(),
                topic_description: topic.description.clone(),
                topic_position: topic.position.to_string(),
                chapter_id: chapter_id.to_string(),
                chapter_name: chapter.name.clone(),
                chapter_description: chapter.description.clone(),
                chapter_position: position.to_string(),
                subject_id: subject_id.to_string(),
            });
        }
    }
    rows
}

/// Encode rows as CSV: header first, CRLF terminators, minimal quoting.
///
/// # Errors
///
/// Returns [`ArtifactError::Csv`] if a row cannot be serialized.
pub fn encode_rows(rows: &[ConceptRow]) -> Result<Vec<u8>, ArtifactError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ArtifactError::Csv(e.into_error().into()))
}

/// Write the identified table for `chapter` at `path`, creating parent dirs.
///
/// # Errors
///
/// Fails on I/O or CSV encoding errors.
pub fn write_concept_table(
    path: &Path,
    chapter: &Chapter,
    subject_id: &Id,
    position: i64,
) -> Result<usize, ArtifactError> {
    let rows = rows_for_tree(chapter, subject_id, position);
    write_rows(path, &rows)?;
    tracing::debug!(path = %path.display(), concepts = rows.len(), "wrote concept table");
    Ok(rows.len())
}

pub(crate) fn write_rows(path: &Path, rows: &[ConceptRow]) -> Result<(), ArtifactError> {
    let bytes = encode_rows(rows)?;
    crate::write_file(path, &bytes)
}

/// Read a concept table without interpreting it.
///
/// # Errors
///
/// Fails on I/O errors, malformed CSV, or a missing required column.
pub fn read_concept_rows(path: &Path) -> Result<Vec<ConceptRow>, ArtifactError> {
    let mut reader = open_csv(path)?;
    require_columns(path, &mut reader, &REQUIRED)?;
    reader
        .deserialize()
        .collect::<Result<Vec<ConceptRow>, _>>()
        .map_err(Into::into)
}

/// Read and decode a concept table.
///
/// # Errors
///
/// See [`read_concept_rows`] and [`ConceptTable::from_rows`].
pub fn read_concept_table(path: &Path) -> Result<ConceptTable, ArtifactError> {
    let rows = read_concept_rows(path)?;
    ConceptTable::from_rows(path, &rows)
}

pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<Cursor<Vec<u8>>>, ArtifactError> {
    let mut bytes = std::fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
    if bytes.starts_with(b"\xEF\xBB\xBF") {
        bytes.drain(..3);
    }
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(Cursor::new(bytes)))
}

pub(crate) fn require_columns(
    path: &Path,
    reader: &mut csv::Reader<Cursor<Vec<u8>>>,
    required: &[&str],
) -> Result<(), ArtifactError> {
    let headers = reader.headers()?;
    for column in required {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(ArtifactError::MissingColumn {
                path: path.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

fn parse_id(path: &Path, index: usize, column: &str, value: &str) -> Result<Id, ArtifactError> {
    if value.trim().is_empty() {
        return Err(ArtifactError::decode(
            path,
            format!("row {}: blank {column}", index + 1),
        ));
    }
    Id::parse(value.trim()).map_err(|_| {
        ArtifactError::decode(
            path,
            format!("row {}: malformed {column} '{value}'", index + 1),
        )
    })
}

/// Blank or non-numeric cells read as 0. Whole floats such as `3.0` are accepted.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn parse_int(value: &str) -> i64 {
    let value = value.trim();
    value.parse::<i64>().unwrap_or_else(|_| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map_or(0, |f| f as i64)
    })
}

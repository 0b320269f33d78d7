//! Question bank upload.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use kb_artifact::{QuestionBank, read_question_bank};
use kb_core::entities::{ConceptLink, QuestionRecord};
use kb_core::enums::QuestionKind;
use kb_core::ids::Id;
use kb_store::KbService;

use crate::error::SyncError;
use crate::stats::ChapterStats;

/// Rows ready to write for one bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedBank {
    pub questions: Vec<QuestionRecord>,
    pub links: Vec<ConceptLink>,
    /// Questions dropped because an earlier one had the same id.
    pub duplicates: usize,
    /// Concept names with no match in the subject, sorted.
    pub unresolved: Vec<String>,
}

/// Build deduplicated question and link rows.
///
/// Ids are always recomputed from content. The first occurrence of an id
/// wins; links are built for every question so a repeated question can still
/// contribute tags its first occurrence lacked.
///
/// # Errors
///
/// Returns [`SyncError::Encode`] if match columns or SVGs fail to serialize.
pub fn prepare_bank(
    bank: &QuestionBank,
    subject_id: Id,
    chapter_id: Option<Id>,
    concepts: &HashMap<String, Id>,
) -> Result<PreparedBank, SyncError> {
    let mut prepared = PreparedBank::default();
    let mut seen_questions = HashSet::new();
    let mut seen_links = HashSet::new();
    let mut unresolved = BTreeSet::new();

    for question in &bank.questions {
        let record = QuestionRecord::from_question(question, subject_id, chapter_id, bank.kind)?;
        if let Some(embedded) = question.id
            && embedded != record.id
        {
            tracing::debug!(%embedded, computed = %record.id, "embedded question id differs; using computed id");
        }

        for name in question.concepts.iter().filter(|n| !n.is_empty()) {
            match concepts.get(name) {
                Some(concept_id) => {
                    let link = ConceptLink::new(record.id, *concept_id);
                    if seen_links.insert(link.id) {
                        prepared.links.push(link);
                    }
                }
                None => {
                    unresolved.insert(name.clone());
                }
            }
        }

        if seen_questions.insert(record.id) {
            prepared.questions.push(record);
        } else {
            prepared.duplicates += 1;
        }
    }

    prepared.unresolved = unresolved.into_iter().collect();
    Ok(prepared)
}

/// Upload one question bank: questions first, then their concept links.
///
/// # Errors
///
/// Fails on unreadable files, a bank for another subject or kind, or a
/// failed write. When the questions land but the links do not, the error is
/// [`SyncError::LinksFailed`] and `stats` keeps the question counts.
pub async fn upload_question_bank(
    service: &KbService,
    subject_id: &Id,
    prefix: &str,
    kind: QuestionKind,
    path: &Path,
    stats: &mut ChapterStats,
) -> Result<(), SyncError> {
    let bank = read_question_bank(path)?;
    if bank.kind != kind {
        return Err(SyncError::KindMismatch {
            expected: kind,
            found: bank.kind,
        });
    }
    if let Some(found) = bank.subject_id
        && found != *subject_id
    {
        return Err(SyncError::SubjectMismatch {
            expected: *subject_id,
            found,
        });
    }

    let chapter_id = match bank.chapter_id {
        Some(id) => Some(id),
        None => {
            service
                .resolve_chapter_id(subject_id, &lookup_name(&bank, prefix))
                .await?
        }
    };

    let concepts = service.concept_map(subject_id).await?;
    let prepared = prepare_bank(&bank, *subject_id, chapter_id, &concepts)?;
    for name in &prepared.unresolved {
        tracing::warn!(chapter = prefix, concept = %name, "concept not found for subject");
    }

    stats.attempted = prepared.questions.len();
    stats.duplicates = prepared.duplicates;
    stats.links_attempted = prepared.links.len();
    stats.unresolved.clone_from(&prepared.unresolved);

    stats.upserted = service.upsert_questions(&prepared.questions).await?;
    stats.links_upserted = service
        .upsert_concept_links(&prepared.links)
        .await
        .map_err(SyncError::LinksFailed)?;

    tracing::info!(
        chapter = prefix,
        %kind,
        questions = stats.upserted,
        links = stats.links_upserted,
        duplicates = stats.duplicates,
        unresolved = stats.unresolved.len(),
        "uploaded question bank"
    );
    Ok(())
}

/// The name to resolve a chapter by when the bank carries no id.
fn lookup_name(bank: &QuestionBank, prefix: &str) -> String {
    if bank.chapter_name.trim().is_empty() {
        prefix
            .trim_start_matches(|c: char| c.is_ascii_digit() || c == '_')
            .to_string()
    } else {
        bank.chapter_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use kb_core::entities::Question;
    use kb_core::ids;
    use pretty_assertions::assert_eq;

    use super::*;

    fn subject() -> Id {
        Id::parse("6f1c2a8e-0c55-4c47-9d2e-3b1f0a6c9e11").unwrap()
    }

    fn question(text: &str, concepts: &[&str]) -> Question {
        Question {
            question_text: Some(text.into()),
            explanation: Some("worked".into()),
            concepts: concepts.iter().map(|c| (*c).to_string()).collect(),
            ..Question::default()
        }
    }

    #[test]
    fn duplicates_are_dropped_and_links_merged() {
        let halves = Id::random();
        let thirds = Id::random();
        let concepts = HashMap::from([
            ("Halves".to_string(), halves),
            ("Thirds".to_string(), thirds),
        ]);
        let bank = QuestionBank::new(
            "Fractions".into(),
            QuestionKind::Exercise,
            vec![
                question("Q1", &["Halves"]),
                question("Q1", &["Halves", "Thirds"]),
                question("Q2", &["Quarters", "", "Halves"]),
            ],
        );

        let prepared = prepare_bank(&bank, subject(), None, &concepts).unwrap();

        assert_eq!(prepared.questions.len(), 2);
        assert_eq!(prepared.duplicates, 1);
        assert_eq!(prepared.links.len(), 3);
        assert_eq!(prepared.unresolved, vec!["Quarters".to_string()]);

        let q1 = ids::question_id(&subject(), Some("Q1"), Some("worked"));
        assert_eq!(prepared.questions[0].id, q1);
        assert_eq!(prepared.links[1], ConceptLink::new(q1, thirds));
    }

    #[test]
    fn records_carry_chapter_and_kind() {
        let chapter = Id::random();
        let bank = QuestionBank::new(
            "Fractions".into(),
            QuestionKind::SolvedExample,
            vec![question("Q", &[])],
        );
        let prepared = prepare_bank(&bank, subject(), Some(chapter), &HashMap::new()).unwrap();
        let record = &prepared.questions[0];
        assert_eq!(record.chapter_id, Some(chapter));
        assert_eq!(record.is_solved_example, 1);
        assert!(prepared.links.is_empty());
    }

    #[test]
    fn lookup_name_falls_back_to_prefix() {
        let named = QuestionBank::new("Fractions".into(), QuestionKind::Exercise, vec![]);
        assert_eq!(lookup_name(&named, "03_x"), "Fractions");
        let unnamed = QuestionBank::new(String::new(), QuestionKind::Exercise, vec![]);
        assert_eq!(lookup_name(&unnamed, "03_whole_numbers"), "whole_numbers");
    }
}

//! Chapter name and id agreement, within the concept table and across a
//! chapter's files.

use kb_artifact::{ChapterFiles, ConceptRow, read_concept_rows, read_question_bank};
use kb_core::enums::QuestionKind;
use kb_core::ids::Id;

use super::bank_label;
use crate::report::{ChapterOutcome, Check, CheckReport};

const SHOWN_INCONSISTENCIES: usize = 3;

/// Check every chapter that has a concept table.
#[must_use]
pub fn check_chapters(groups: &[ChapterFiles]) -> CheckReport {
    let outcomes = groups
        .iter()
        .filter(|files| files.concepts.is_some())
        .map(check_chapter)
        .collect();
    CheckReport::from_outcomes(Check::Chapters, outcomes)
}

fn check_chapter(files: &ChapterFiles) -> ChapterOutcome {
    let mut outcome = ChapterOutcome::new(&files.prefix);
    let Some(path) = &files.concepts else {
        return outcome;
    };
    let rows = match read_concept_rows(path) {
        Ok(rows) => rows,
        Err(error) => {
            outcome.fail(format!("Concept table unreadable: {error}"));
            return outcome;
        }
    };
    let Some(first) = rows.first() else {
        outcome.fail("Concept table has no rows");
        return outcome;
    };
    let chapter_name = first.chapter_name.trim();
    let chapter_id = first.chapter_id.trim();

    let inconsistencies = internal_inconsistencies(&rows);
    for issue in inconsistencies.iter().take(SHOWN_INCONSISTENCIES) {
        outcome.fail(format!("CSV internal: {issue}"));
    }
    if inconsistencies.len() > SHOWN_INCONSISTENCIES {
        outcome.fail(format!(
            "CSV internal: ... and {} more inconsistencies",
            inconsistencies.len() - SHOWN_INCONSISTENCIES
        ));
    }

    for kind in QuestionKind::ALL {
        let Some(bank_path) = files.questions(kind) else {
            continue;
        };
        let label = bank_label(kind);
        let bank = match read_question_bank(bank_path) {
            Ok(bank) => bank,
            Err(error) => {
                outcome.fail(format!("{label} JSON unreadable: {error}"));
                continue;
            }
        };
        let bank_name = bank.chapter_name.trim();
        if bank_name != chapter_name {
            outcome.fail(format!(
                "{label} JSON chapter_name mismatch: CSV='{chapter_name}' vs JSON='{bank_name}'"
            ));
        }
        if let Some(bank_id) = bank.chapter_id
            && !chapter_id.is_empty()
            && Id::parse(chapter_id).ok() != Some(bank_id)
        {
            outcome.fail(format!(
                "{label} JSON chapter_id mismatch: CSV='{chapter_id}' vs JSON='{bank_id}'"
            ));
        }
    }
    outcome
}

/// Rows whose chapter name or id differs from the first row, numbered from 1.
fn internal_inconsistencies(rows: &[ConceptRow]) -> Vec<String> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let name = first.chapter_name.trim();
    let id = first.chapter_id.trim();
    let mut found = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let row_name = row.chapter_name.trim();
        let row_id = row.chapter_id.trim();
        if row_name != name {
            found.push(format!(
                "Row {}: chapter_name '{row_name}' != first row '{name}'",
                index + 1
            ));
        }
        if row_id != id {
            found.push(format!(
                "Row {}: chapter_id '{row_id}' != first row '{id}'",
                index + 1
            ));
        }
    }
    found
}

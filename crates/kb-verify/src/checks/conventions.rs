//! File naming: position prefixes, recorded positions, and complete sibling sets.

use std::path::Path;

use kb_artifact::naming::{self, questions_file_name};
use kb_artifact::{ChapterFiles, read_concept_rows};
use kb_core::enums::QuestionKind;

use crate::report::{ChapterOutcome, Check, CheckReport};

#[must_use]
pub fn check_conventions(groups: &[ChapterFiles]) -> CheckReport {
    let mut outcomes = Vec::new();
    for files in groups {
        match &files.concepts {
            Some(path) => outcomes.push(check_chapter(files, path)),
            None => outcomes.extend(orphans(files)),
        }
    }
    CheckReport::from_outcomes(Check::Conventions, outcomes)
}

fn check_chapter(files: &ChapterFiles, concepts: &Path) -> ChapterOutcome {
    let prefix = files.prefix.as_str();
    let mut outcome = ChapterOutcome::new(prefix);

    let digits = prefix
        .split_once('_')
        .map(|(head, _)| head)
        .filter(|head| !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit()));
    let Some(digits) = digits else {
        outcome.fail(format!(
            "Filename missing number prefix: {}",
            naming::concepts_file_name(prefix)
        ));
        check_siblings(files, &mut outcome);
        return outcome;
    };

    match recorded_position(concepts) {
        Err(error) => outcome.fail(format!("Concept table unreadable: {error}")),
        Ok(None) => outcome.fail("CSV missing chapter_position column"),
        Ok(Some(position)) => match (digits.parse::<i64>(), position.parse::<i64>()) {
            (Ok(number), Ok(recorded)) if number == recorded => {}
            (Ok(_), Ok(_)) => outcome.fail(format!(
                "Filename number ({digits}) != chapter_position ({position})"
            )),
            _ => outcome.fail(format!(
                "Invalid number format: filename='{digits}', position='{position}'"
            )),
        },
    }

    check_siblings(files, &mut outcome);
    outcome
}

/// The first row's `chapter_position`, when present and non-blank.
fn recorded_position(path: &Path) -> Result<Option<String>, kb_artifact::ArtifactError> {
    let rows = read_concept_rows(path)?;
    Ok(rows
        .first()
        .map(|row| row.chapter_position.trim().to_string())
        .filter(|position| !position.is_empty()))
}

fn check_siblings(files: &ChapterFiles, outcome: &mut ChapterOutcome) {
    if files.exercise.is_none() {
        outcome.fail(format!(
            "Missing exercise JSON: {}",
            questions_file_name(&files.prefix, QuestionKind::Exercise)
        ));
    }
    if files.solved.is_none() {
        outcome.fail(format!(
            "Missing solved JSON: {}",
            questions_file_name(&files.prefix, QuestionKind::SolvedExample)
        ));
    }
}

/// One failing outcome per question file that has no concept table.
fn orphans(files: &ChapterFiles) -> Vec<ChapterOutcome> {
    QuestionKind::ALL
        .into_iter()
        .filter(|kind| files.questions(*kind).is_some())
        .map(|kind| {
            let mut outcome = ChapterOutcome::new(&files.prefix);
            outcome.fail(format!(
                "Orphan file without concept table: {}",
                questions_file_name(&files.prefix, kind)
            ));
            outcome
        })
        .collect()
}

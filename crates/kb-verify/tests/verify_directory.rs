//! End-to-end verification over directories written by the artifact codec.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use kb_ai::{AiError, ConceptSuggester, SuggestionRequest};
use kb_artifact::naming::{chapter_prefix, concepts_file_name, questions_file_name};
use kb_artifact::{QuestionBank, write_concept_table, write_question_bank};
use kb_core::entities::{Chapter, Concept, Question, Topic};
use kb_core::enums::QuestionKind;
use kb_core::ids::{self, Id};
use kb_verify::{Check, Classification, Verifier, VerifyOptions, VerifyReport};
use pretty_assertions::assert_eq;

fn subject() -> Id {
    let board = Id::parse("0f8fad5b-d9cb-469f-a165-70867728950e").unwrap();
    ids::subject_id(&ids::school_class_id(&board, "Class 6"), "Mathematics")
}

fn chapter(name: &str, concepts: &[&str]) -> Chapter {
    Chapter {
        name: name.to_string(),
        description: format!("All about {name}"),
        topics: vec![Topic {
            name: "Basics".into(),
            description: String::new(),
            position: 1,
            concepts: concepts
                .iter()
                .map(|c| Concept {
                    name: (*c).to_string(),
                    description: format!("{c} explained"),
                    page_number: 1,
                })
                .collect(),
        }],
    }
}

fn question(text: &str, concepts: &[&str]) -> Question {
    Question {
        question_text: Some(text.to_string()),
        explanation: Some(format!("Because {text}")),
        concepts: concepts.iter().map(ToString::to_string).collect(),
        ..Question::default()
    }
}

/// Write a complete chapter and return its prefix.
fn write_chapter(
    dir: &Path,
    position: i64,
    tree: &Chapter,
    exercise: Vec<Question>,
    solved: Vec<Question>,
) -> String {
    let prefix = chapter_prefix(position, &tree.name);
    write_concept_table(
        &dir.join(concepts_file_name(&prefix)),
        tree,
        &subject(),
        position,
    )
    .unwrap();
    for (kind, questions) in [
        (QuestionKind::Exercise, exercise),
        (QuestionKind::SolvedExample, solved),
    ] {
        let bank = QuestionBank::new(tree.name.clone(), kind, questions).identified(subject());
        write_question_bank(&dir.join(questions_file_name(&prefix, kind)), &bank).unwrap();
    }
    prefix
}

fn failed_prefixes(report: &VerifyReport, check: Check) -> Vec<String> {
    report
        .check(check)
        .unwrap()
        .failures()
        .map(|c| c.prefix.clone())
        .collect()
}

#[tokio::test]
async fn clean_directory_passes_every_check() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(
        dir.path(),
        1,
        &chapter("Fractions", &["Proper Fractions", "Like Fractions"]),
        vec![question("Is 1/2 proper?", &["Proper Fractions"])],
        vec![question("Add 1/5 and 2/5", &["Like Fractions"])],
    );
    write_chapter(
        dir.path(),
        2,
        &chapter("Integers", &["Negative Numbers"]),
        vec![question("Is -3 < 0?", &["Negative Numbers"])],
        vec![],
    );

    let report = Verifier::new(VerifyOptions::all())
        .unwrap()
        .run(dir.path())
        .await
        .unwrap();

    assert!(!report.has_failures(), "{report:#?}");
    assert_eq!(report.checks.len(), 3);
    for check in &report.checks {
        assert_eq!((check.passed, check.failed), (2, 0));
    }
}

#[tokio::test]
async fn sibling_with_foreign_chapter_id_fails_only_that_chapter() {
    let dir = tempfile::tempdir().unwrap();
    let fractions = write_chapter(
        dir.path(),
        1,
        &chapter("Fractions", &["Proper Fractions"]),
        vec![],
        vec![],
    );
    write_chapter(
        dir.path(),
        2,
        &chapter("Integers", &["Negative Numbers"]),
        vec![],
        vec![],
    );

    let h1 = ids::chapter_id(&subject(), "Fractions");
    let h2 = ids::chapter_id(&subject(), "Fractions (old)");
    let mut bank = QuestionBank::new("Fractions".into(), QuestionKind::Exercise, vec![])
        .identified(subject());
    bank.chapter_id = Some(h2);
    write_question_bank(
        &dir.path().join(questions_file_name(&fractions, QuestionKind::Exercise)),
        &bank,
    )
    .unwrap();

    let options = VerifyOptions {
        check_chapters: true,
        ..VerifyOptions::default()
    };
    let report = Verifier::new(options)
        .unwrap()
        .run(dir.path())
        .await
        .unwrap();

    assert!(report.has_failures());
    let chapters = report.check(Check::Chapters).unwrap();
    assert_eq!((chapters.passed, chapters.failed), (1, 1));
    assert_eq!(failed_prefixes(&report, Check::Chapters), vec![fractions]);
    assert_eq!(
        chapters.chapters[0].issues,
        vec![format!(
            "Exercise JSON chapter_id mismatch: CSV='{h1}' vs JSON='{h2}'"
        )]
    );
}

#[tokio::test]
async fn concept_check_reports_each_mismatch_class() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = write_chapter(
        dir.path(),
        1,
        &chapter("Fractions", &["Fractions", "Like Fractions", "Decimals"]),
        vec![
            question("Q1", &["Fractions "]),
            question("Q2", &["fractions", "Ratios"]),
        ],
        vec![question("S1", &["Like\u{3000}Fractions", "Ratios"])],
    );

    let options = VerifyOptions {
        check_concepts: true,
        ..VerifyOptions::default()
    };
    let report = Verifier::new(options)
        .unwrap()
        .run(dir.path())
        .await
        .unwrap();

    let concepts = report.check(Check::Concepts).unwrap();
    assert_eq!(failed_prefixes(&report, Check::Concepts), vec![prefix]);
    let found: Vec<(&str, &Classification)> = concepts.chapters[0]
        .concepts
        .iter()
        .map(|i| (i.name.as_str(), &i.classification))
        .collect();
    assert_eq!(
        found,
        vec![
            (
                "Fractions ",
                &Classification::Whitespace {
                    correct: "Fractions".into()
                }
            ),
            (
                "Like\u{3000}Fractions",
                &Classification::Unicode {
                    correct: "Like Fractions".into()
                }
            ),
            (
                "Ratios",
                &Classification::Missing {
                    suggestions: vec!["Fractions".into(), "Like Fractions".into()]
                }
            ),
            (
                "fractions",
                &Classification::Case {
                    correct: "Fractions".into()
                }
            ),
        ]
    );
}

/// Suggests a fixed name, except for questions it refuses to answer.
struct FixedSuggester;

#[async_trait]
impl ConceptSuggester for FixedSuggester {
    async fn suggest_concept(&self, request: &SuggestionRequest) -> Result<Option<String>, AiError> {
        if request.question_text.contains("broken") {
            return Err(AiError::EmptyResponse);
        }
        assert!(request.catalog.iter().any(|e| e.name == "Ratio and Proportion"));
        Ok(Some("Ratio and Proportion".to_string()))
    }
}

#[tokio::test]
async fn suggestions_attach_and_failures_degrade() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(
        dir.path(),
        1,
        &chapter("Ratios", &["Ratio and Proportion", "Unitary Method"]),
        vec![
            question("Compare 2:3 and 4:6", &["Ratios"]),
            question("broken question", &["Ratios"]),
        ],
        vec![],
    );

    let options = VerifyOptions {
        check_concepts: true,
        suggest: true,
        concurrency: 2,
        ..VerifyOptions::default()
    };
    let report = Verifier::new(options)
        .unwrap()
        .with_suggester(Arc::new(FixedSuggester))
        .run(dir.path())
        .await
        .unwrap();

    let issue = &report.check(Check::Concepts).unwrap().chapters[0].concepts[0];
    assert_eq!(issue.name, "Ratios");
    let suggested: Vec<(usize, Option<&str>)> = issue
        .proposals
        .iter()
        .map(|p| (p.question_index, p.suggested.as_deref()))
        .collect();
    assert_eq!(
        suggested,
        vec![(1, Some("Ratio and Proportion")), (2, None)]
    );
}

#[tokio::test]
async fn conventions_flag_orphans_and_missing_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let fractions = write_chapter(
        dir.path(),
        1,
        &chapter("Fractions", &["Fractions"]),
        vec![],
        vec![],
    );
    std::fs::remove_file(
        dir.path()
            .join(questions_file_name(&fractions, QuestionKind::SolvedExample)),
    )
    .unwrap();
    let orphan = QuestionBank::new("Data Handling".into(), QuestionKind::Exercise, vec![]);
    write_question_bank(
        &dir.path()
            .join(questions_file_name("09_data_handling", QuestionKind::Exercise)),
        &orphan,
    )
    .unwrap();

    let options = VerifyOptions {
        check_conventions: true,
        ..VerifyOptions::default()
    };
    let report = Verifier::new(options)
        .unwrap()
        .run(dir.path())
        .await
        .unwrap();

    let conventions = report.check(Check::Conventions).unwrap();
    assert_eq!((conventions.passed, conventions.failed), (0, 2));
    let issues: Vec<&str> = conventions
        .chapters
        .iter()
        .flat_map(|c| c.issues.iter().map(String::as_str))
        .collect();
    assert_eq!(
        issues,
        vec![
            "Missing solved JSON: 01_fractions_solved_examples.json",
            "Orphan file without concept table: 09_data_handling_exercise_questions.json",
        ]
    );
}

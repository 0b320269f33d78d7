//! End-to-end syncs against the in-memory store.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kb_artifact::naming::{concepts_file_name, questions_file_name};
use kb_artifact::{QuestionBank, write_concept_table, write_question_bank};
use kb_core::entities::{Chapter, Concept, Question, Topic};
use kb_core::enums::QuestionKind;
use kb_core::ids::{self, Id};
use async_trait::async_trait;
use kb_store::{Filter, KbService, MemoryStore, RemoteStore, Row, StoreError, Table};
use kb_sync::questions::upload_question_bank;
use kb_sync::{ChapterStats, KindSelection, SyncError, SyncPipeline, SyncTarget};
use pretty_assertions::assert_eq;

fn subject() -> Id {
    Id::parse("6f1c2a8e-0c55-4c47-9d2e-3b1f0a6c9e11").unwrap()
}

fn chapter() -> Chapter {
    Chapter {
        name: "Fractions".into(),
        description: String::new(),
        topics: vec![Topic {
            name: "Basics".into(),
            description: String::new(),
            position: 1,
            concepts: vec![
                Concept {
                    name: "Halves".into(),
                    description: String::new(),
                    page_number: 1,
                },
                Concept {
                    name: "Thirds".into(),
                    description: String::new(),
                    page_number: 2,
                },
            ],
        }],
    }
}

fn question(text: &str, concepts: &[&str]) -> Question {
    Question {
        question_text: Some(text.into()),
        explanation: Some("see text".into()),
        concepts: concepts.iter().map(|c| (*c).to_string()).collect(),
        ..Question::default()
    }
}

fn write_chapter(dir: &Path, prefix: &str, with_solved: bool) {
    write_concept_table(
        &dir.join(concepts_file_name(prefix)),
        &chapter(),
        &subject(),
        1,
    )
    .unwrap();
    let exercise = QuestionBank::new(
        "Fractions".into(),
        QuestionKind::Exercise,
        vec![
            question("Shade half", &["Halves"]),
            question("Shade half", &["Halves"]),
            question("Shade a third", &["Thirds", "Quarters"]),
        ],
    )
    .identified(subject());
    write_question_bank(
        &dir.join(questions_file_name(prefix, QuestionKind::Exercise)),
        &exercise,
    )
    .unwrap();

    if with_solved {
        let solved = QuestionBank::new(
            "Fractions".into(),
            QuestionKind::SolvedExample,
            vec![question("Example 1", &["Halves", "Thirds"])],
        );
        write_question_bank(
            &dir.join(questions_file_name(prefix, QuestionKind::SolvedExample)),
            &solved,
        )
        .unwrap();
    }
}

#[tokio::test]
async fn concepts_then_questions_converge() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(dir.path(), "01_fractions", true);

    let store = Arc::new(MemoryStore::new());
    let pipeline = SyncPipeline::new(KbService::new(store.clone()), subject(), 2);

    let concepts = pipeline.sync_concepts(dir.path()).await.unwrap();
    assert!(!concepts.has_failures());
    assert_eq!(concepts.chapters[0].upserted, 4);
    assert_eq!(store.len(Table::Chapters), 1);
    assert_eq!(store.len(Table::Topics), 1);
    assert_eq!(store.len(Table::Concepts), 2);

    let concepts_again = pipeline.sync_concepts(dir.path()).await.unwrap();
    assert_eq!(concepts_again.totals, concepts.totals);
    assert_eq!(store.len(Table::Concepts), 2);

    let summary = pipeline
        .sync_questions(dir.path(), KindSelection::Both)
        .await
        .unwrap();
    assert!(!summary.has_failures(), "{summary:?}");
    assert_eq!(summary.chapters.len(), 2);

    let exercise = summary
        .chapters
        .iter()
        .find(|c| c.kind == "exercise")
        .unwrap();
    assert_eq!(exercise.attempted, 2);
    assert_eq!(exercise.duplicates, 1);
    assert_eq!(exercise.links_upserted, 2);
    assert_eq!(exercise.unresolved, vec!["Quarters".to_string()]);

    assert_eq!(store.len(Table::BankQuestions), 3);
    assert_eq!(store.len(Table::ConceptLinks), 4);

    // A second run writes the same ids.
    let again = pipeline
        .sync_questions(dir.path(), KindSelection::Both)
        .await
        .unwrap();
    assert!(!again.has_failures());
    assert_eq!(again.totals, summary.totals);
    assert_eq!(store.len(Table::BankQuestions), 3);
    assert_eq!(store.len(Table::ConceptLinks), 4);
}

#[tokio::test]
async fn solved_bank_without_ids_resolves_chapter_by_name() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(dir.path(), "01_fractions", true);

    let store = Arc::new(MemoryStore::new());
    let service = KbService::new(store.clone());
    let pipeline = SyncPipeline::new(service.clone(), subject(), 1);
    pipeline.sync_concepts(dir.path()).await.unwrap();
    pipeline
        .sync_questions(dir.path(), KindSelection::Solved)
        .await
        .unwrap();

    let rows: Vec<kb_core::entities::QuestionRecord> =
        service.fetch(Table::BankQuestions, &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].chapter_id,
        Some(ids::chapter_id(&subject(), "Fractions"))
    );
    assert_eq!(rows[0].is_solved_example, 1);
}

#[tokio::test]
async fn missing_bank_fails_only_that_chapter() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(dir.path(), "01_fractions", false);
    write_chapter(dir.path(), "02_fractions_again", true);

    let done = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&done);
    let pipeline = SyncPipeline::new(
        KbService::new(Arc::new(MemoryStore::new())),
        subject(),
        4,
    )
    .on_chapter_done(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let summary = pipeline
        .sync_questions(dir.path(), KindSelection::Both)
        .await
        .unwrap();

    assert_eq!(done.load(Ordering::SeqCst), 4);
    assert_eq!(summary.totals.failed, 1);
    let failed = summary.chapters.iter().find(|c| c.failed).unwrap();
    assert_eq!(failed.chapter, "01_fractions");
    assert_eq!(failed.kind, "solved_example");
    assert!(failed.error.as_deref().unwrap().contains("no solved_example question file"));
    assert_eq!(
        summary.chapters.iter().map(|c| c.chapter.as_str()).collect::<Vec<_>>(),
        vec!["01_fractions", "01_fractions", "02_fractions_again", "02_fractions_again"]
    );
}

#[tokio::test]
async fn foreign_subject_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(dir.path(), "01_fractions", true);

    let other = Id::parse("1b4e28ba-2fa1-41d2-883f-0016d3cca427").unwrap();
    let pipeline = SyncPipeline::new(KbService::new(Arc::new(MemoryStore::new())), other, 1);

    let concepts = pipeline.sync_concepts(dir.path()).await.unwrap();
    assert!(concepts.has_failures());
    assert!(concepts.chapters[0]
        .error
        .as_deref()
        .unwrap()
        .contains("subject mismatch"));

    let questions = pipeline
        .sync_questions(dir.path(), KindSelection::Exercise)
        .await
        .unwrap();
    assert!(questions.has_failures());
}

#[tokio::test]
async fn repeated_concept_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut tree = chapter();
    let halves = tree.topics[0].concepts[0].clone();
    tree.topics[0].concepts.insert(1, halves);
    write_concept_table(
        &dir.path().join(concepts_file_name("01_fractions")),
        &tree,
        &subject(),
        1,
    )
    .unwrap();

    let store = Arc::new(MemoryStore::new());
    let pipeline = SyncPipeline::new(KbService::new(store.clone()), subject(), 1);
    let summary = pipeline.sync_concepts(dir.path()).await.unwrap();

    assert!(!summary.has_failures(), "{summary:?}");
    let stats = &summary.chapters[0];
    assert_eq!(stats.duplicates, 1);
    let concepts = stats.tables.iter().find(|t| t.table == "concepts").unwrap();
    assert_eq!((concepts.attempted, concepts.upserted), (2, 2));
    assert_eq!(store.len(Table::Concepts), 2);
}

/// Delegates to a memory store but rejects upserts into one table whose
/// batch carries `needle` in any column.
struct RejectingStore {
    inner: MemoryStore,
    table: Table,
    needle: Option<serde_json::Value>,
}

impl RejectingStore {
    fn new(table: Table, needle: Option<&str>) -> Self {
        Self {
            inner: MemoryStore::new(),
            table,
            needle: needle.map(|n| serde_json::Value::String(n.to_string())),
        }
    }

    fn rejects(&self, table: Table, rows: &[Row]) -> bool {
        table == self.table
            && self
                .needle
                .as_ref()
                .is_none_or(|needle| rows.iter().any(|row| row.values().any(|v| v == needle)))
    }
}

#[async_trait]
impl RemoteStore for RejectingStore {
    fn backend(&self) -> &'static str {
        "rejecting"
    }

    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        self.inner.select(table, filters).await
    }

    async fn upsert(&self, table: Table, rows: &[Row]) -> Result<usize, StoreError> {
        if self.rejects(table, rows) {
            return Err(StoreError::Api {
                status: 500,
                message: format!("{} write refused", table.as_str()),
            });
        }
        self.inner.upsert(table, rows).await
    }
}

#[tokio::test]
async fn failed_links_keep_written_questions() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(dir.path(), "01_fractions", false);

    let store = Arc::new(RejectingStore::new(Table::ConceptLinks, None));
    let service = KbService::new(store.clone());
    SyncPipeline::new(service.clone(), subject(), 1)
        .sync_concepts(dir.path())
        .await
        .unwrap();

    let mut stats = ChapterStats::new("01_fractions", SyncTarget::Questions(QuestionKind::Exercise));
    let err = upload_question_bank(
        &service,
        &subject(),
        "01_fractions",
        QuestionKind::Exercise,
        &dir.path()
            .join(questions_file_name("01_fractions", QuestionKind::Exercise)),
        &mut stats,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SyncError::LinksFailed(StoreError::Api { status: 500, .. })));
    assert_eq!(stats.upserted, 2);
    assert_eq!(stats.links_attempted, 2);
    assert_eq!(stats.links_upserted, 0);
    assert_eq!(store.inner.len(Table::BankQuestions), 2);
    assert_eq!(store.inner.len(Table::ConceptLinks), 0);

    let summary = SyncPipeline::new(service, subject(), 1)
        .sync_questions(dir.path(), KindSelection::Exercise)
        .await
        .unwrap();
    let unit = &summary.chapters[0];
    assert!(unit.failed);
    assert_eq!(unit.upserted, 2);
    assert!(unit
        .error
        .as_deref()
        .unwrap()
        .starts_with("questions written but concept links failed"));
}

#[tokio::test]
async fn rejected_write_fails_only_its_chapter() {
    let dir = tempfile::tempdir().unwrap();
    write_chapter(dir.path(), "01_fractions", false);
    write_chapter(dir.path(), "02_fractions_again", false);
    let sibling = QuestionBank::new(
        "Fractions".into(),
        QuestionKind::Exercise,
        vec![question("Shade a quarter", &["Halves"])],
    );
    write_question_bank(
        &dir.path()
            .join(questions_file_name("02_fractions_again", QuestionKind::Exercise)),
        &sibling,
    )
    .unwrap();

    let store = Arc::new(RejectingStore::new(
        Table::BankQuestions,
        Some("Shade a quarter"),
    ));
    let pipeline = SyncPipeline::new(KbService::new(store.clone()), subject(), 2);
    pipeline.sync_concepts(dir.path()).await.unwrap();

    let summary = pipeline
        .sync_questions(dir.path(), KindSelection::Exercise)
        .await
        .unwrap();

    assert_eq!(summary.totals.chapters, 2);
    assert_eq!(summary.totals.failed, 1);
    let (first, second) = (&summary.chapters[0], &summary.chapters[1]);
    assert_eq!(first.chapter, "01_fractions");
    assert!(!first.failed);
    assert_eq!((first.upserted, first.links_upserted), (2, 2));
    assert_eq!(second.chapter, "02_fractions_again");
    assert!(second.failed);
    assert_eq!(second.upserted, 0);
    assert!(second.error.as_deref().unwrap().contains("bank_questions write refused"));
    assert_eq!(store.inner.len(Table::BankQuestions), 2);
}

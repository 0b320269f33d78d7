//! Question banks: one JSON file per chapter and kind.

use std::path::Path;

use kb_core::entities::Question;
use kb_core::enums::QuestionKind;
use kb_core::ids::{self, Id};
use kb_core::serde_util::{blank_id_as_none, null_as_default};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// A chapter's solved examples or exercise questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    pub chapter_name: String,
    pub chapter_id: Option<Id>,
    pub subject_id: Option<Id>,
    pub kind: QuestionKind,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    #[must_use]
    pub const fn new(chapter_name: String, kind: QuestionKind, questions: Vec<Question>) -> Self {
        Self {
            chapter_name,
            chapter_id: None,
            subject_id: None,
            kind,
            questions,
        }
    }

    /// Stamp subject, chapter, and question ids derived under `subject_id`.
    #[must_use]
    pub fn identified(mut self, subject_id: Id) -> Self {
        self.chapter_id = Some(ids::chapter_id(&subject_id, &self.chapter_name));
        self.subject_id = Some(subject_id);
        for question in &mut self.questions {
            question.id = Some(question.fingerprint(&subject_id));
        }
        self
    }
}

#[derive(Deserialize)]
struct BankFile<Q> {
    #[serde(default, deserialize_with = "null_as_default")]
    chapter_name: String,
    #[serde(default, deserialize_with = "blank_id_as_none")]
    chapter_id: Option<Id>,
    #[serde(default, deserialize_with = "blank_id_as_none")]
    subject_id: Option<Id>,
    exercise_questions: Option<Vec<Q>>,
    solved_examples_questions: Option<Vec<Q>>,
}

impl<Q> BankFile<Q> {
    fn into_list(self, path: &Path) -> Result<(BankHeader, QuestionKind, Vec<Q>), ArtifactError> {
        let header = BankHeader {
            chapter_name: self.chapter_name,
            chapter_id: self.chapter_id,
            subject_id: self.subject_id,
        };
        match (self.exercise_questions, self.solved_examples_questions) {
            (Some(list), None) => Ok((header, QuestionKind::Exercise, list)),
            (None, Some(list)) => Ok((header, QuestionKind::SolvedExample, list)),
            (Some(_), Some(_)) => Err(ArtifactError::decode(
                path,
                "bank holds both exercise and solved example lists",
            )),
            (None, None) => Err(ArtifactError::decode(path, "bank holds no question list")),
        }
    }
}

pub(crate) struct BankHeader {
    pub chapter_name: String,
    pub chapter_id: Option<Id>,
    pub subject_id: Option<Id>,
}

#[derive(Serialize)]
struct BankOut<'a, Q> {
    chapter_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chapter_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exercise_questions: Option<&'a [Q]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solved_examples_questions: Option<&'a [Q]>,
}

/// Read a bank, accepting either list key.
///
/// # Errors
///
/// Fails on I/O errors, invalid JSON, malformed envelope ids, or when the
/// file holds no (or both) question lists.
pub fn read_question_bank(path: &Path) -> Result<QuestionBank, ArtifactError> {
    let (header, kind, questions) = read_bank_file::<Question>(path)?;
    Ok(QuestionBank {
        chapter_name: header.chapter_name,
        chapter_id: header.chapter_id,
        subject_id: header.subject_id,
        kind,
        questions,
    })
}

pub(crate) fn read_bank_file<Q>(
    path: &Path,
) -> Result<(BankHeader, QuestionKind, Vec<Q>), ArtifactError>
where
    Q: for<'de> Deserialize<'de>,
{
    let bytes = std::fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
    let file: BankFile<Q> = serde_json::from_slice(&bytes)
        .map_err(|e| ArtifactError::decode(path, format!("invalid question bank: {e}")))?;
    file.into_list(path)
}

/// Encode as four-space indented UTF-8 JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`ArtifactError::Json`] if serialization fails.
pub fn encode_question_bank(bank: &QuestionBank) -> Result<Vec<u8>, ArtifactError> {
    let header = BankHeader {
        chapter_name: bank.chapter_name.clone(),
        chapter_id: bank.chapter_id,
        subject_id: bank.subject_id,
    };
    encode_bank(&header, bank.kind, &bank.questions)
}

pub(crate) fn encode_bank<Q: Serialize>(
    header: &BankHeader,
    kind: QuestionKind,
    questions: &[Q],
) -> Result<Vec<u8>, ArtifactError> {
    let out = BankOut {
        chapter_name: &header.chapter_name,
        chapter_id: header.chapter_id,
        subject_id: header.subject_id,
        exercise_questions: (kind == QuestionKind::Exercise).then_some(questions),
        solved_examples_questions: (kind == QuestionKind::SolvedExample).then_some(questions),
    };

    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    out.serialize(&mut serializer)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write a bank at `path`, creating parent directories.
///
/// # Errors
///
/// Fails on I/O or encoding errors.
pub fn write_question_bank(path: &Path, bank: &QuestionBank) -> Result<(), ArtifactError> {
    let bytes = encode_question_bank(bank)?;
    crate::write_file(path, &bytes)?;
    tracing::debug!(
        path = %path.display(),
        kind = %bank.kind,
        questions = bank.questions.len(),
        "wrote question bank"
    );
    Ok(())
}

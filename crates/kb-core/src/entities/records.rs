use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::QuestionKind;
use crate::ids::{self, Id};
use crate::question_type::normalize_question_type;
use crate::serde_util::null_as_default;

use super::Question;

// ---------------------------------------------------------------------------
// Concept hierarchy rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChapterRecord {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub subject_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TopicRecord {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub chapter_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConceptRecord {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub topic_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_number: i64,
}

// ---------------------------------------------------------------------------
// Question bank rows
// ---------------------------------------------------------------------------

/// A row of the `bank_questions` table.
///
/// Every key is always present (nulls included) so a batch of rows shares one
/// column set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: Id,
    pub subject_id: Id,
    pub chapter_id: Option<Id>,
    pub question_text: Option<String>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub option4: Option<String>,
    /// JSON text of the match columns.
    pub match_columns: Option<String>,
    /// JSON text of the SVG list.
    pub svgs: Option<String>,
    pub correct_mcq_option: Option<i64>,
    pub msq_option1_answer: Option<bool>,
    pub msq_option2_answer: Option<bool>,
    pub msq_option3_answer: Option<bool>,
    pub msq_option4_answer: Option<bool>,
    pub is_true: Option<bool>,
    pub answer_text: Option<String>,
    pub explanation: Option<String>,
    pub hardness_level: Option<String>,
    pub question_type: Option<String>,
    pub is_image_needed: u8,
    pub is_solved_example: u8,
    pub is_from_exercise: u8,
    pub is_incomplete: u8,
}

impl QuestionRecord {
    /// Build the stored row for `question`. The id is always recomputed from content.
    ///
    /// # Errors
    ///
    /// Fails only if the match columns or SVGs cannot be serialized.
    pub fn from_question(
        question: &Question,
        subject_id: Id,
        chapter_id: Option<Id>,
        kind: QuestionKind,
    ) -> Result<Self, serde_json::Error> {
        let match_columns = match question.match_columns.as_deref() {
            Some(columns) if !columns.is_empty() => Some(serde_json::to_string(columns)?),
            _ => None,
        };
        let svgs = match question.svgs.as_deref() {
            Some(svgs) if !svgs.is_empty() => Some(serde_json::to_string(svgs)?),
            _ => None,
        };
        let hardness_level = question
            .hardness_level
            .as_deref()
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty());

        Ok(Self {
            id: question.fingerprint(&subject_id),
            subject_id,
            chapter_id,
            question_text: question.question_text.clone(),
            option1: question.option1.clone(),
            option2: question.option2.clone(),
            option3: question.option3.clone(),
            option4: question.option4.clone(),
            match_columns,
            svgs,
            correct_mcq_option: question.correct_mcq_option,
            msq_option1_answer: question.msq_option1_answer,
            msq_option2_answer: question.msq_option2_answer,
            msq_option3_answer: question.msq_option3_answer,
            msq_option4_answer: question.msq_option4_answer,
            is_true: question.istrue,
            answer_text: question.answer_text.clone(),
            explanation: question.explanation.clone(),
            hardness_level,
            question_type: normalize_question_type(question.question_type.as_deref()),
            is_image_needed: u8::from(question.is_image_needed != 0),
            is_solved_example: u8::from(kind.is_solved_example()),
            is_from_exercise: u8::from(!kind.is_solved_example()),
            is_incomplete: u8::from(question.is_incomplete()),
        })
    }
}

/// A row of `bank_questions_concepts_maps`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConceptLink {
    pub id: Id,
    pub concept_id: Id,
    pub bank_question_id: Id,
}

impl ConceptLink {
    #[must_use]
    pub fn new(bank_question_id: Id, concept_id: Id) -> Self {
        Self {
            id: ids::link_id(&bank_question_id, &concept_id),
            concept_id,
            bank_question_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::MatchColumn;

    fn subject() -> Id {
        Id::parse("6f1c2a8e-0c55-4c47-9d2e-3b1f0a6c9e11").unwrap()
    }

    #[test]
    fn record_flags_follow_kind_and_completeness() {
        let question = Question {
            question_text: Some("Which is larger, 1/2 or 1/3?".into()),
            explanation: None,
            hardness_level: Some(" Medium ".into()),
            question_type: Some("MCQ4".into()),
            ..Question::default()
        };

        let record =
            QuestionRecord::from_question(&question, subject(), None, QuestionKind::SolvedExample)
                .unwrap();

        assert_eq!(record.id, question.fingerprint(&subject()));
        assert_eq!(record.is_solved_example, 1);
        assert_eq!(record.is_from_exercise, 0);
        assert_eq!(record.is_incomplete, 1);
        assert_eq!(record.hardness_level.as_deref(), Some("medium"));
        assert_eq!(record.question_type.as_deref(), Some("mcq4"));
    }

    #[test]
    fn record_ignores_embedded_id() {
        let question = Question {
            id: Some(Id::random()),
            question_text: Some("Q".into()),
            ..Question::default()
        };
        let record =
            QuestionRecord::from_question(&question, subject(), None, QuestionKind::Exercise)
                .unwrap();
        assert_eq!(record.id, ids::question_id(&subject(), Some("Q"), None));
        assert_eq!(record.is_from_exercise, 1);
    }

    #[test]
    fn match_columns_are_stored_as_json_text() {
        let question = Question {
            question_text: Some("Match".into()),
            match_columns: Some(vec![MatchColumn {
                column_name: "A".into(),
                items: vec!["1/2".into()],
            }]),
            ..Question::default()
        };
        let record =
            QuestionRecord::from_question(&question, subject(), None, QuestionKind::Exercise)
                .unwrap();
        assert_eq!(
            record.match_columns.as_deref(),
            Some(r#"[{"column_name":"A","items":["1/2"]}]"#)
        );
        assert_eq!(record.svgs, None);
    }

    #[test]
    fn link_id_is_stable() {
        let question = Id::random();
        let concept = Id::random();
        assert_eq!(
            ConceptLink::new(question, concept),
            ConceptLink::new(question, concept)
        );
    }
}

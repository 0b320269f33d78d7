use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{self, Id};
use crate::serde_util::{blank_id_as_none, flag, null_as_default, string_list};

/// One column of a "match the following" question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MatchColumn {
    pub column_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}

/// An inline SVG figure attached to a question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Svg {
    pub svg: String,
}

/// A solved example or exercise question as stored in a bank file.
///
/// Which fields are meaningful depends on `question_type`; everything beyond
/// the text is optional. Concepts are referenced by name and only resolved to
/// ids at sync time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_id_as_none"
    )]
    pub id: Option<Id>,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
    #[serde(default)]
    pub option4: Option<String>,
    #[serde(default)]
    pub match_columns: Option<Vec<MatchColumn>>,
    #[serde(default)]
    pub svgs: Option<Vec<Svg>>,
    #[serde(default)]
    pub correct_mcq_option: Option<i64>,
    #[serde(default)]
    pub msq_option1_answer: Option<bool>,
    #[serde(default)]
    pub msq_option2_answer: Option<bool>,
    #[serde(default)]
    pub msq_option3_answer: Option<bool>,
    #[serde(default)]
    pub msq_option4_answer: Option<bool>,
    #[serde(default)]
    pub istrue: Option<bool>,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub hardness_level: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub concepts: Vec<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_image_needed: u8,
}

impl Question {
    /// The content fingerprint id of this question under `subject`.
    #[must_use]
    pub fn fingerprint(&self, subject: &Id) -> Id {
        ids::question_id(
            subject,
            self.question_text.as_deref(),
            self.explanation.as_deref(),
        )
    }

    /// Text, explanation, or a required figure is missing.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());
        blank(&self.question_text) || blank(&self.explanation) || self.is_image_needed != 0
    }
}

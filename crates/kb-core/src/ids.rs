//! Deterministic identifiers for the content hierarchy.
//!
//! Every non-root entity id is a UUID v5 of its parent's id (as namespace) and
//! its own name:
//!
//! ```text
//! board (random v4) → school class → subject → chapter → topic → concept
//! subject → question (content fingerprint)
//! question → concept link
//! ```
//!
//! Independent runs over the same content converge on the same ids without
//! any coordination. Derivation never accepts an unparsed parent: callers go
//! through [`Id::parse`] (or [`derive_from_str`]) first, which rejects
//! malformed input instead of coercing it.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// A content-hierarchy identifier. Serialized as a lowercase hyphenated UUID.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    /// Parse an identifier, rejecting anything that is not a UUID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedId`] when `value` is not a valid UUID.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| CoreError::MalformedId {
                value: value.to_string(),
            })
    }

    /// A fresh random identifier. Only boards get one of these.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Id {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whether `value` is a syntactically valid identifier.
///
/// Accepts every textual UUID form (hyphenated, simple, braced, urn).
#[must_use]
pub fn is_valid_id(value: &str) -> bool {
    Id::parse(value).is_ok()
}

/// Derive a child id from its parent id and its own name.
#[must_use]
pub fn derive(parent: &Id, name: &str) -> Id {
    Id(Uuid::new_v5(&parent.0, name.as_bytes()))
}

/// Derive a child id from an unparsed parent id.
///
/// # Errors
///
/// Returns [`CoreError::MalformedId`] when `parent` is not a valid identifier.
pub fn derive_from_str(parent: &str, name: &str) -> Result<Id, CoreError> {
    Ok(derive(&Id::parse(parent)?, name))
}

// ---------------------------------------------------------------------------
// Hierarchy chain
// ---------------------------------------------------------------------------

#[must_use]
pub fn school_class_id(board: &Id, class_name: &str) -> Id {
    derive(board, class_name)
}

#[must_use]
pub fn subject_id(school_class: &Id, subject_name: &str) -> Id {
    derive(school_class, subject_name)
}

#[must_use]
pub fn chapter_id(subject: &Id, chapter_name: &str) -> Id {
    derive(subject, chapter_name)
}

#[must_use]
pub fn topic_id(chapter: &Id, topic_name: &str) -> Id {
    derive(chapter, topic_name)
}

#[must_use]
pub fn concept_id(topic: &Id, concept_name: &str) -> Id {
    derive(topic, concept_name)
}

// ---------------------------------------------------------------------------
// Content-addressed ids
// ---------------------------------------------------------------------------

/// Fingerprint id for a question.
///
/// The hashed name is the subject id joined with `_` to the question text and
/// the explanation, each included only when non-empty. Two questions sharing
/// subject, text, and explanation get the same id regardless of their other
/// fields.
#[must_use]
pub fn question_id(subject: &Id, question_text: Option<&str>, explanation: Option<&str>) -> Id {
    let subject_str = subject.to_string();
    let mut parts = vec![subject_str.as_str()];
    parts.extend(question_text.filter(|text| !text.is_empty()));
    parts.extend(explanation.filter(|text| !text.is_empty()));
    derive(subject, &parts.join("_"))
}

/// Id of the join row between a question and a concept.
#[must_use]
pub fn link_id(question: &Id, concept: &Id) -> Id {
    derive(question, &concept.to_string())
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::serde_util::null_as_default;

/// The smallest unit of knowledge in a chapter, e.g. "Addition of Fractions".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Concept {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_number: i64,
}

/// A group of related concepts inside a chapter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub concepts: Vec<Concept>,
    /// 1-indexed order within the chapter.
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i64,
}

/// A textbook chapter as extracted, before any id is attached.
///
/// The chapter's own position is not part of the tree; it comes from the
/// source file ordering and is supplied when the tree is written out.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Chapter {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<Topic>,
}

impl Chapter {
    /// Every concept name in tree order.
    pub fn concept_names(&self) -> impl Iterator<Item = &str> {
        self.topics
            .iter()
            .flat_map(|topic| topic.concepts.iter().map(|concept| concept.name.as_str()))
    }
}

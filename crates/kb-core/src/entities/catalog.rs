use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::Id;
use crate::serde_util::null_as_default;

/// An education board. The root of the hierarchy; its id is random.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Board {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SchoolClass {
    pub id: Id,
    pub name: String,
    pub board_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Subject {
    pub id: Id,
    pub name: String,
    pub school_class_id: Id,
}

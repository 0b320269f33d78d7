//! Entity structs for the kbase content model.
//!
//! Two families live here: the content tree as extracted from a textbook
//! (no identifiers, names only) and the rows mirrored in the remote store
//! (every row keyed by an [`Id`](crate::ids::Id)). All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema`.

mod catalog;
mod content;
mod question;
mod records;

pub use catalog::{Board, SchoolClass, Subject};
pub use content::{Chapter, Concept, Topic};
pub use question::{MatchColumn, Question, Svg};
pub use records::{ChapterRecord, ConceptLink, ConceptRecord, QuestionRecord, TopicRecord};

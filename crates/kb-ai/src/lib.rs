//! # kb-ai
//!
//! The generative model collaborator: chapter and question extraction from
//! textbook PDFs, and concept suggestions for question tags that name no
//! known concept. [`GeminiClient`] implements both seams; tests and offline
//! runs substitute their own implementations.

pub mod document;
pub mod error;
pub mod gemini;
pub mod prompts;

mod http;

use async_trait::async_trait;
use kb_core::entities::{Chapter, Question};
use kb_core::enums::QuestionKind;

pub use document::Document;
pub use error::AiError;
pub use gemini::GeminiClient;

/// Questions pulled from a chapter document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuestions {
    pub chapter_name: String,
    pub questions: Vec<Question>,
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract the chapter → topic → concept tree.
    async fn extract_chapter(&self, document: &Document) -> Result<Chapter, AiError>;

    /// Extract one bank of questions, tagging each with names from `concept_names`.
    async fn extract_questions(
        &self,
        kind: QuestionKind,
        document: &Document,
        concept_names: &[String],
    ) -> Result<ExtractedQuestions, AiError>;
}

/// A concept from the chapter catalog as shown to the suggester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// The tag that matched nothing.
    pub missing_concept: String,
    pub question_text: String,
    pub current_concepts: Vec<String>,
    pub catalog: Vec<CatalogEntry>,
}

#[async_trait]
pub trait ConceptSuggester: Send + Sync {
    /// Propose the catalog name a question should have used. `None` when nothing fits.
    async fn suggest_concept(&self, request: &SuggestionRequest) -> Result<Option<String>, AiError>;
}

/// Interpret a free-text suggestion reply. Blank and `NONE` mean no suggestion.
#[must_use]
pub fn parse_suggestion(reply: &str) -> Option<String> {
    let name = reply.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() || name.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(name.to_string())
}

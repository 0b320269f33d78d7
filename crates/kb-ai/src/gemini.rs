//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use kb_config::AiConfig;
use kb_core::entities::{Chapter, Question};
use kb_core::enums::QuestionKind;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::AiError;
use crate::http::check_response;
use crate::{ConceptSuggester, ExtractedQuestions, Extractor, SuggestionRequest, prompts};

/// One client per process; the inner `reqwest::Client` pools connections.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::NotConfigured`] without an API key, or
    /// [`AiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        if !config.is_configured() {
            return Err(AiError::NotConfigured(
                "ai.api_key is empty (set KBASE_AI__API_KEY or GEMINI_API_KEY)".to_string(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent("kbase/0.1")
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one request and return the concatenated text of the first candidate.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        tracing::debug!(model = %self.model, "generateContent");
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let body: GenerateResponse = resp.json().await?;
        body.into_text().ok_or(AiError::EmptyResponse)
    }

    async fn generate_json<T>(&self, prompt: String, document: &Document) -> Result<T, AiError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let request = GenerateRequest::new(prompt, Some(document), self.temperature)
            .expecting_json(response_schema::<T>()?);
        let text = self.generate(&request).await?;
        parse_json_reply(&text)
    }
}

#[async_trait]
impl Extractor for GeminiClient {
    async fn extract_chapter(&self, document: &Document) -> Result<Chapter, AiError> {
        let chapter: Chapter = self
            .generate_json(prompts::CHAPTER_PROMPT.to_string(), document)
            .await?;
        tracing::info!(
            document = %document.name,
            chapter = %chapter.name,
            topics = chapter.topics.len(),
            concepts = chapter.concept_names().count(),
            "extracted chapter"
        );
        Ok(chapter)
    }

    async fn extract_questions(
        &self,
        kind: QuestionKind,
        document: &Document,
        concept_names: &[String],
    ) -> Result<ExtractedQuestions, AiError> {
        let reply: QuestionsReply = self
            .generate_json(prompts::questions_prompt(kind, concept_names), document)
            .await?;
        tracing::info!(
            document = %document.name,
            %kind,
            questions = reply.questions.len(),
            "extracted questions"
        );
        Ok(ExtractedQuestions {
            chapter_name: reply.chapter_name,
            questions: reply.questions,
        })
    }
}

#[async_trait]
impl ConceptSuggester for GeminiClient {
    async fn suggest_concept(&self, request: &SuggestionRequest) -> Result<Option<String>, AiError> {
        let request = GenerateRequest::new(
            prompts::suggestion_prompt(request),
            None,
            self.temperature,
        );
        let text = self.generate(&request).await?;
        Ok(crate::parse_suggestion(&text))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
struct QuestionsReply {
    chapter_name: String,
    #[serde(alias = "exercise_questions", alias = "solved_examples_questions")]
    questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Inline { inline_data: Blob },
}

#[derive(Debug, Serialize)]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<Value>,
}

impl GenerateRequest {
    pub(crate) fn new(prompt: String, document: Option<&Document>, temperature: f32) -> Self {
        let mut parts = vec![Part::Text { text: prompt }];
        if let Some(document) = document {
            parts.push(Part::Inline {
                inline_data: Blob {
                    mime_type: document.mime_type.clone(),
                    data: BASE64.encode(&document.bytes),
                },
            });
        }
        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: None,
                response_json_schema: None,
            },
        }
    }

    pub(crate) fn expecting_json(mut self, schema: Value) -> Self {
        self.generation_config.response_mime_type = Some("application/json");
        self.generation_config.response_json_schema = Some(schema);
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn response_schema<T: JsonSchema>() -> Result<Value, AiError> {
    let mut schema = serde_json::to_value(schemars::schema_for!(T))
        .map_err(|e| AiError::Parse(format!("response schema: {e}")))?;
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    Ok(schema)
}

/// Decode a JSON reply, tolerating a surrounding markdown code fence.
pub(crate) fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim()).map_err(|e| AiError::Parse(e.to_string()))
}

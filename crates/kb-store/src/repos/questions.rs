//! Question bank writes.

use kb_core::entities::{ConceptLink, QuestionRecord};

use crate::error::StoreError;
use crate::service::KbService;
use crate::table::Table;

impl KbService {
    pub async fn upsert_questions(&self, rows: &[QuestionRecord]) -> Result<usize, StoreError> {
        self.put(Table::BankQuestions, rows).await
    }

    pub async fn upsert_concept_links(&self, rows: &[ConceptLink]) -> Result<usize, StoreError> {
        self.put(Table::ConceptLinks, rows).await
    }
}

//! Chapter, topic, and concept rows: writes and name lookups across a subject.

use std::collections::HashMap;

use kb_core::entities::{ChapterRecord, ConceptRecord, TopicRecord};
use kb_core::ids::Id;

use crate::error::StoreError;
use crate::service::KbService;
use crate::table::Table;

impl KbService {
    pub async fn upsert_chapter(&self, row: &ChapterRecord) -> Result<usize, StoreError> {
        self.put(Table::Chapters, std::slice::from_ref(row)).await
    }

    pub async fn upsert_topics(&self, rows: &[TopicRecord]) -> Result<usize, StoreError> {
        self.put(Table::Topics, rows).await
    }

    pub async fn upsert_concepts(&self, rows: &[ConceptRecord]) -> Result<usize, StoreError> {
        self.put(Table::Concepts, rows).await
    }

    /// Map every stored concept name of a subject to its id.
    ///
    /// Walks subject → chapters → topics → concepts. Names are keyed trimmed,
    /// the way the verifier reads concept tables. When two concepts share a
    /// name the later one (in id order) wins.
    pub async fn concept_map(&self, subject_id: &Id) -> Result<HashMap<String, Id>, StoreError> {
        let chapter_ids: Vec<String> = self
            .chapters_for_subject(subject_id)
            .await?
            .iter()
            .map(|c| c.id.to_string())
            .collect();

        let topic_ids: Vec<String> = self
            .fetch_in::<TopicRecord>(Table::Topics, "chapter_id", &chapter_ids)
            .await?
            .iter()
            .map(|t| t.id.to_string())
            .collect();

        let concepts = self
            .fetch_in::<ConceptRecord>(Table::Concepts, "topic_id", &topic_ids)
            .await?;

        if concepts.is_empty() {
            tracing::warn!(%subject_id, "no concepts stored for subject");
        }
        Ok(concepts
            .into_iter()
            .map(|c| (c.name.trim().to_string(), c.id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kb_core::ids;

    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn concept_map_is_scoped_to_subject() {
        let svc = KbService::new(Arc::new(MemoryStore::new()));
        let maths = Id::parse("6f1c2a8e-0c55-4c47-9d2e-3b1f0a6c9e11").unwrap();
        let science = Id::parse("1b4e28ba-2fa1-41d2-883f-0016d3cca427").unwrap();

        for (subject, concept_name) in [(maths, "Like Fractions"), (science, "Photosynthesis")] {
            let chapter = ChapterRecord {
                id: ids::chapter_id(&subject, "Chapter"),
                name: "Chapter".into(),
                description: String::new(),
                subject_id: subject,
                position: 1,
            };
            let topic = TopicRecord {
                id: ids::topic_id(&chapter.id, "Topic"),
                name: "Topic".into(),
                description: String::new(),
                chapter_id: chapter.id,
                position: 1,
            };
            let concept = ConceptRecord {
                id: ids::concept_id(&topic.id, concept_name),
                name: concept_name.into(),
                description: String::new(),
                topic_id: topic.id,
                page_number: 1,
            };
            svc.upsert_chapter(&chapter).await.unwrap();
            svc.upsert_topics(&[topic]).await.unwrap();
            svc.upsert_concepts(&[concept]).await.unwrap();
        }

        let map = svc.concept_map(&maths).await.unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("Like Fractions"));
        assert!(!map.contains_key("Photosynthesis"));
    }

    #[tokio::test]
    async fn stored_names_are_keyed_trimmed() {
        let svc = KbService::new(Arc::new(MemoryStore::new()));
        let subject = Id::parse("6f1c2a8e-0c55-4c47-9d2e-3b1f0a6c9e11").unwrap();
        let chapter = ChapterRecord {
            id: ids::chapter_id(&subject, "Fractions"),
            name: "Fractions".into(),
            description: String::new(),
            subject_id: subject,
            position: 1,
        };
        let topic = TopicRecord {
            id: ids::topic_id(&chapter.id, "Basics"),
            name: "Basics".into(),
            description: String::new(),
            chapter_id: chapter.id,
            position: 1,
        };
        let halves = ConceptRecord {
            id: ids::concept_id(&topic.id, "Halves "),
            name: "Halves ".into(),
            description: String::new(),
            topic_id: topic.id,
            page_number: 1,
        };
        svc.upsert_chapter(&chapter).await.unwrap();
        svc.upsert_topics(&[topic]).await.unwrap();
        svc.upsert_concepts(std::slice::from_ref(&halves)).await.unwrap();

        let map = svc.concept_map(&subject).await.unwrap();
        assert_eq!(map.get("Halves"), Some(&halves.id));
        assert!(!map.contains_key("Halves "));
    }

    #[tokio::test]
    async fn empty_subject_gives_empty_map() {
        let svc = KbService::new(Arc::new(MemoryStore::new()));
        assert!(svc.concept_map(&Id::random()).await.unwrap().is_empty());
    }
}

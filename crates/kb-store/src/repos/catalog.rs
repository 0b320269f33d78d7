//! Boards, school classes, and subjects.

use kb_core::entities::{Board, SchoolClass, Subject};
use kb_core::ids::{self, Id};

use crate::error::StoreError;
use crate::filter::Filter;
use crate::service::KbService;
use crate::table::Table;

impl KbService {
    /// Create a board under a fresh random id.
    pub async fn create_board(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Board, StoreError> {
        let board = Board {
            id: Id::random(),
            name: name.to_string(),
            description: description
                .filter(|d| !d.trim().is_empty())
                .map(String::from),
        };
        self.put(Table::Boards, std::slice::from_ref(&board)).await?;
        tracing::info!(board = %board.name, id = %board.id, "created board");
        Ok(board)
    }

    pub async fn get_board(&self, id: &Id) -> Result<Option<Board>, StoreError> {
        let mut boards = self
            .fetch::<Board>(Table::Boards, &[Filter::eq("id", id)])
            .await?;
        Ok(boards.pop())
    }

    /// All boards, or those whose name contains `name` (any case), sorted by name.
    pub async fn list_boards(&self, name: Option<&str>) -> Result<Vec<Board>, StoreError> {
        let filters = name
            .map(|n| vec![Filter::contains_ci("name", n)])
            .unwrap_or_default();
        let mut boards = self.fetch::<Board>(Table::Boards, &filters).await?;
        boards.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(boards)
    }

    /// Create (or refresh) a class under an existing board. The id is derived.
    pub async fn create_school_class(
        &self,
        board_id: &Id,
        name: &str,
        position: i64,
    ) -> Result<SchoolClass, StoreError> {
        if self.get_board(board_id).await?.is_none() {
            return Err(StoreError::NotFound {
                entity: "board".into(),
                id: board_id.to_string(),
            });
        }

        let class = SchoolClass {
            id: ids::school_class_id(board_id, name),
            name: name.to_string(),
            board_id: *board_id,
            position,
        };
        self.put(Table::SchoolClasses, std::slice::from_ref(&class))
            .await?;
        tracing::info!(class = %class.name, id = %class.id, "upserted school class");
        Ok(class)
    }

    pub async fn get_school_class(&self, id: &Id) -> Result<Option<SchoolClass>, StoreError> {
        let mut classes = self
            .fetch::<SchoolClass>(Table::SchoolClasses, &[Filter::eq("id", id)])
            .await?;
        Ok(classes.pop())
    }

    /// Classes of a board ordered by position.
    pub async fn list_school_classes(&self, board_id: &Id) -> Result<Vec<SchoolClass>, StoreError> {
        let mut classes = self
            .fetch::<SchoolClass>(Table::SchoolClasses, &[Filter::eq("board_id", board_id)])
            .await?;
        classes.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
        Ok(classes)
    }

    /// Create (or refresh) a subject under an existing class. The id is derived.
    pub async fn create_subject(
        &self,
        school_class_id: &Id,
        name: &str,
    ) -> Result<Subject, StoreError> {
        if self.get_school_class(school_class_id).await?.is_none() {
            return Err(StoreError::NotFound {
                entity: "school class".into(),
                id: school_class_id.to_string(),
            });
        }

        let subject = Subject {
            id: ids::subject_id(school_class_id, name),
            name: name.to_string(),
            school_class_id: *school_class_id,
        };
        self.put(Table::Subjects, std::slice::from_ref(&subject))
            .await?;
        tracing::info!(subject = %subject.name, id = %subject.id, "upserted subject");
        Ok(subject)
    }

    pub async fn get_subject(&self, id: &Id) -> Result<Option<Subject>, StoreError> {
        let mut subjects = self
            .fetch::<Subject>(Table::Subjects, &[Filter::eq("id", id)])
            .await?;
        Ok(subjects.pop())
    }

    pub async fn list_subjects(&self, school_class_id: &Id) -> Result<Vec<Subject>, StoreError> {
        let mut subjects = self
            .fetch::<Subject>(
                Table::Subjects,
                &[Filter::eq("school_class_id", school_class_id)],
            )
            .await?;
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MemoryStore;

    fn service() -> KbService {
        KbService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn class_and_subject_ids_follow_the_chain() {
        let svc = service();
        let board = svc.create_board("CBSE", Some("Central Board")).await.unwrap();
        let class = svc
            .create_school_class(&board.id, "Class 6", 6)
            .await
            .unwrap();
        let subject = svc.create_subject(&class.id, "Mathematics").await.unwrap();

        assert_eq!(class.id, ids::school_class_id(&board.id, "Class 6"));
        assert_eq!(subject.id, ids::subject_id(&class.id, "Mathematics"));
        assert_eq!(svc.get_subject(&subject.id).await.unwrap(), Some(subject));
    }

    #[tokio::test]
    async fn class_requires_existing_board() {
        let svc = service();
        let err = svc
            .create_school_class(&Id::random(), "Class 6", 6)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity, .. } if entity == "board"));
    }

    #[tokio::test]
    async fn readding_a_class_is_idempotent() {
        let svc = service();
        let board = svc.create_board("RBSE", None).await.unwrap();
        svc.create_school_class(&board.id, "Class 7", 7).await.unwrap();
        svc.create_school_class(&board.id, "Class 7", 7).await.unwrap();
        svc.create_school_class(&board.id, "Class 6", 6).await.unwrap();

        let classes = svc.list_school_classes(&board.id).await.unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Class 6", "Class 7"]);
    }

    #[tokio::test]
    async fn list_boards_filters_by_name_substring() {
        let svc = service();
        svc.create_board("Rajasthan Board", None).await.unwrap();
        svc.create_board("CBSE", None).await.unwrap();

        let all = svc.list_boards(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "CBSE");

        let matching = svc.list_boards(Some("rajas")).await.unwrap();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "Rajasthan Board");
    }
}

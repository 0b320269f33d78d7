//! Chapter lookups.

use kb_core::entities::ChapterRecord;
use kb_core::ids::Id;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::service::KbService;
use crate::table::Table;

/// Pick the chapter a local name refers to.
///
/// Exact name match ignoring case wins. Otherwise a partial match: the local
/// name with `_` read as spaces contains the stored name, or the other way
/// round (so `01_knowing_our_numbers` finds "Knowing Our Numbers").
#[must_use]
pub fn match_chapter<'a>(chapters: &'a [ChapterRecord], name: &str) -> Option<&'a ChapterRecord> {
    let wanted = name.to_lowercase();
    if let Some(exact) = chapters.iter().find(|c| c.name.to_lowercase() == wanted) {
        return Some(exact);
    }

    let loose = wanted.replace('_', " ");
    chapters.iter().find(|c| {
        let stored = c.name.to_lowercase();
        loose.contains(&stored) || stored.contains(&loose)
    })
}

impl KbService {
    pub async fn chapters_for_subject(
        &self,
        subject_id: &Id,
    ) -> Result<Vec<ChapterRecord>, StoreError> {
        let mut chapters = self
            .fetch::<ChapterRecord>(Table::Chapters, &[Filter::eq("subject_id", subject_id)])
            .await?;
        chapters.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
        Ok(chapters)
    }

    /// Resolve a chapter name to its stored id, if any chapter fits.
    ///
    /// A miss is logged and returned as `None`; callers carry on without a chapter link.
    pub async fn resolve_chapter_id(
        &self,
        subject_id: &Id,
        name: &str,
    ) -> Result<Option<Id>, StoreError> {
        let chapters = self.chapters_for_subject(subject_id).await?;
        if chapters.is_empty() {
            tracing::warn!(%subject_id, "no chapters stored for subject");
            return Ok(None);
        }

        match match_chapter(&chapters, name) {
            Some(chapter) => {
                tracing::debug!(chapter = name, id = %chapter.id, "resolved chapter");
                Ok(Some(chapter.id))
            }
            None => {
                tracing::warn!(chapter = name, %subject_id, "chapter not found for subject");
                Ok(None)
            }
        }
    }
}

//! Per-chapter outcomes and run totals.

use std::fmt;

use kb_core::enums::QuestionKind;
use serde::Serialize;

/// What a unit of work uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyncTarget {
    Concepts,
    Questions(QuestionKind),
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concepts => f.write_str("concepts"),
            Self::Questions(kind) => kind.fmt(f),
        }
    }
}

/// Which question banks a run uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindSelection {
    Exercise,
    Solved,
    #[default]
    Both,
}

impl KindSelection {
    #[must_use]
    pub fn kinds(self) -> Vec<QuestionKind> {
        match self {
            Self::Exercise => vec![QuestionKind::Exercise],
            Self::Solved => vec![QuestionKind::SolvedExample],
            Self::Both => QuestionKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub attempted: usize,
    pub upserted: usize,
}

/// Outcome of one chapter unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChapterStats {
    /// Chapter file prefix, e.g. `01_fractions`.
    pub chapter: String,
    pub kind: String,
    pub attempted: usize,
    pub upserted: usize,
    pub duplicates: usize,
    pub links_attempted: usize,
    pub links_upserted: usize,
    pub unresolved: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableCount>,
    pub failed: bool,
    pub error: Option<String>,
}

impl ChapterStats {
    #[must_use]
    pub fn new(chapter: &str, target: SyncTarget) -> Self {
        Self {
            chapter: chapter.to_string(),
            kind: target.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn record_table(&mut self, table: &str, attempted: usize, upserted: usize) {
        self.attempted += attempted;
        self.upserted += upserted;
        self.tables.push(TableCount {
            table: table.to_string(),
            attempted,
            upserted,
        });
    }

    pub(crate) fn fail(&mut self, error: impl ToString) {
        self.failed = true;
        self.error = Some(error.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub chapters: usize,
    pub failed: usize,
    pub attempted: usize,
    pub upserted: usize,
    pub duplicates: usize,
    pub links_upserted: usize,
    pub unresolved: usize,
}

/// Every unit of a run, sorted by chapter prefix then kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub chapters: Vec<ChapterStats>,
    pub totals: Totals,
}

impl RunSummary {
    #[must_use]
    pub fn from_chapters(mut chapters: Vec<ChapterStats>) -> Self {
        chapters.sort_by(|a, b| a.chapter.cmp(&b.chapter).then_with(|| a.kind.cmp(&b.kind)));
        let totals = chapters.iter().fold(Totals::default(), |mut t, c| {
            t.chapters += 1;
            t.failed += usize::from(c.failed);
            t.attempted += c.attempted;
            t.upserted += c.upserted;
            t.duplicates += c.duplicates;
            t.links_upserted += c.links_upserted;
            t.unresolved += c.unresolved.len();
            t
        });
        Self { chapters, totals }
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.totals.failed > 0
    }
}

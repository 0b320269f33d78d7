//! Bounded-concurrency runs over a chapter directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kb_artifact::discover;
use kb_core::ids::Id;
use kb_store::KbService;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::concepts::upload_concept_table;
use crate::error::SyncError;
use crate::questions::upload_question_bank;
use crate::stats::{ChapterStats, KindSelection, RunSummary, SyncTarget};

type ProgressFn = Box<dyn Fn(&ChapterStats) + Send + Sync>;

/// One file to upload.
#[derive(Debug, Clone)]
struct Unit {
    prefix: String,
    target: SyncTarget,
    path: PathBuf,
}

/// Uploads a directory of chapter artifacts for one subject.
pub struct SyncPipeline {
    service: KbService,
    subject_id: Id,
    concurrency: usize,
    on_done: Option<ProgressFn>,
}

impl SyncPipeline {
    #[must_use]
    pub fn new(service: KbService, subject_id: Id, concurrency: usize) -> Self {
        Self {
            service,
            subject_id,
            concurrency: concurrency.max(1),
            on_done: None,
        }
    }

    /// Called on the driving task after each unit finishes.
    #[must_use]
    pub fn on_chapter_done(mut self, f: impl Fn(&ChapterStats) + Send + Sync + 'static) -> Self {
        self.on_done = Some(Box::new(f));
        self
    }

    /// Upload every concept table in `dir`.
    ///
    /// # Errors
    ///
    /// Fails only when the directory cannot be listed. Per-chapter failures
    /// are reported in the summary.
    pub async fn sync_concepts(&self, dir: &Path) -> Result<RunSummary, SyncError> {
        let units = discover(dir)?
            .into_iter()
            .filter_map(|files| {
                files.concepts.map(|path| Unit {
                    prefix: files.prefix,
                    target: SyncTarget::Concepts,
                    path,
                })
            })
            .collect();
        Ok(self.run(units, Vec::new()).await)
    }

    /// Upload the selected question banks of every chapter in `dir` that has any.
    ///
    /// A chapter missing a selected bank fails with [`SyncError::MissingArtifact`].
    ///
    /// # Errors
    ///
    /// Fails only when the directory cannot be listed.
    pub async fn sync_questions(
        &self,
        dir: &Path,
        selection: KindSelection,
    ) -> Result<RunSummary, SyncError> {
        let mut units = Vec::new();
        let mut missing = Vec::new();
        for files in discover(dir)?.into_iter().filter(|f| f.has_questions()) {
            for kind in selection.kinds() {
                let target = SyncTarget::Questions(kind);
                match files.questions(kind) {
                    Some(path) => units.push(Unit {
                        prefix: files.prefix.clone(),
                        target,
                        path: path.to_path_buf(),
                    }),
                    None => {
                        let error = SyncError::MissingArtifact {
                            prefix: files.prefix.clone(),
                            kind,
                        };
                        tracing::error!(%error, "missing question file");
                        let mut stats = ChapterStats::new(&files.prefix, target);
                        stats.fail(error);
                        missing.push(stats);
                    }
                }
            }
        }
        Ok(self.run(units, missing).await)
    }

    async fn run(&self, units: Vec<Unit>, mut results: Vec<ChapterStats>) -> RunSummary {
        for stats in &results {
            self.report(stats);
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut set = JoinSet::new();
        let mut pending: HashSet<(String, String)> = HashSet::new();

        for unit in units {
            pending.insert((unit.prefix.clone(), unit.target.to_string()));
            let service = self.service.clone();
            let subject_id = self.subject_id;
            let sem = Arc::clone(&semaphore);
            set.spawn(async move {
                let mut stats = ChapterStats::new(&unit.prefix, unit.target);
                let Ok(_permit) = sem.acquire().await else {
                    stats.fail("upload queue closed");
                    return stats;
                };
                if let Err(error) = upload_unit(&service, &subject_id, &unit, &mut stats).await {
                    tracing::error!(chapter = %unit.prefix, target = %unit.target, %error, "chapter failed");
                    stats.fail(error);
                }
                stats
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(stats) => {
                    pending.remove(&(stats.chapter.clone(), stats.kind.clone()));
                    self.report(&stats);
                    results.push(stats);
                }
                Err(error) => tracing::error!(%error, "upload task did not complete"),
            }
        }

        // Whatever is still pending panicked or was cancelled.
        for (prefix, kind) in pending {
            let mut stats = ChapterStats {
                chapter: prefix,
                kind,
                ..ChapterStats::default()
            };
            stats.fail("upload task panicked");
            self.report(&stats);
            results.push(stats);
        }

        RunSummary::from_chapters(results)
    }

    fn report(&self, stats: &ChapterStats) {
        if let Some(on_done) = &self.on_done {
            on_done(stats);
        }
    }
}

async fn upload_unit(
    service: &KbService,
    subject_id: &Id,
    unit: &Unit,
    stats: &mut ChapterStats,
) -> Result<(), SyncError> {
    match unit.target {
        SyncTarget::Concepts => upload_concept_table(service, subject_id, &unit.path, stats).await,
        SyncTarget::Questions(kind) => {
            upload_question_bank(service, subject_id, &unit.prefix, kind, &unit.path, stats).await
        }
    }
}

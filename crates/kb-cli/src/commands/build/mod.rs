//! Generate artifacts from chapter PDFs with the AI extractor.

mod concepts;
mod questions;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use kb_artifact::naming::{chapter_prefix, leading_number};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BuildCommands;
use crate::context::AppContext;
use crate::output::output_report;
use crate::progress::Progress;

/// Handle `kbase build`.
pub async fn handle(action: &BuildCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let extractor = ctx.gemini()?;
    let concurrency = ctx.generation_concurrency();
    let summary = match action {
        BuildCommands::Concepts(source) => {
            concepts::build_concepts(extractor, source, concurrency).await?
        }
        BuildCommands::Questions(args) => {
            questions::build_questions(extractor, &args.source, args.kind.into(), concurrency)
                .await?
        }
    };

    output_report(&summary, &summary.documents, &summary.totals, flags.format)?;
    if summary.totals.failed > 0 {
        bail!(
            "{} of {} document(s) failed",
            summary.totals.failed,
            summary.documents.len()
        );
    }
    Ok(())
}

/// A chapter PDF and the artifact prefix it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourcePdf {
    pub path: PathBuf,
    pub position: i64,
    pub prefix: String,
    /// File stem without its number, with separators as spaces.
    pub title: String,
}

/// PDFs of `dir` in name order. A `NN_` stem prefix gives the position;
/// otherwise the 1-based place in the listing does.
pub(crate) fn list_pdfs(dir: &Path) -> anyhow::Result<Vec<SourcePdf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    paths.sort();

    let mut pdfs = Vec::with_capacity(paths.len());
    for (index, path) in paths.into_iter().enumerate() {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (position, rest) = match leading_number(&stem) {
            Some(number) => (number, stem.split_once('_').map_or("", |(_, rest)| rest)),
            None => (i64::try_from(index + 1)?, stem.as_str()),
        };
        let title = rest
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        pdfs.push(SourcePdf {
            prefix: chapter_prefix(position, rest),
            position,
            title,
            path,
        });
    }
    Ok(pdfs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum BuildStatus {
    Written,
    Skipped,
    Failed,
}

/// What happened to one PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DocumentOutcome {
    pub pdf: String,
    pub output: String,
    pub status: BuildStatus,
    /// Concepts or questions written.
    pub items: usize,
    pub error: Option<String>,
}

impl DocumentOutcome {
    fn new(pdf: &SourcePdf, output: &Path, status: BuildStatus) -> Self {
        Self {
            pdf: pdf.path.display().to_string(),
            output: output.display().to_string(),
            status,
            items: 0,
            error: None,
        }
    }

    pub fn skipped(pdf: &SourcePdf, output: &Path) -> Self {
        tracing::info!(output = %output.display(), "output exists; skipping");
        Self::new(pdf, output, BuildStatus::Skipped)
    }

    pub fn finish(pdf: &SourcePdf, output: &Path, result: anyhow::Result<usize>) -> Self {
        match result {
            Ok(items) => Self {
                items,
                ..Self::new(pdf, output, BuildStatus::Written)
            },
            Err(error) => {
                tracing::error!(pdf = %pdf.path.display(), error = %format!("{error:#}"), "build failed");
                Self {
                    error: Some(format!("{error:#}")),
                    ..Self::new(pdf, output, BuildStatus::Failed)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct BuildTotals {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub items: usize,
}

/// Every document of a run, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct BuildSummary {
    pub documents: Vec<DocumentOutcome>,
    pub totals: BuildTotals,
}

impl BuildSummary {
    fn from_documents(documents: Vec<DocumentOutcome>) -> Self {
        let totals = documents.iter().fold(BuildTotals::default(), |mut t, d| {
            match d.status {
                BuildStatus::Written => t.written += 1,
                BuildStatus::Skipped => t.skipped += 1,
                BuildStatus::Failed => t.failed += 1,
            }
            t.items += d.items;
            t
        });
        Self { documents, totals }
    }
}

/// Run `job` for every PDF with at most `concurrency` in flight.
async fn run_jobs<F, Fut>(
    pdfs: Vec<SourcePdf>,
    concurrency: usize,
    message: &str,
    output_for: impl Fn(&SourcePdf) -> PathBuf,
    job: F,
) -> BuildSummary
where
    F: Fn(SourcePdf) -> Fut,
    Fut: Future<Output = DocumentOutcome> + Send + 'static,
{
    let progress = Progress::bar(pdfs.len(), message);
    let bar = progress.handle();

    // Replaced as tasks finish; whatever is left did not complete.
    let mut outcomes: Vec<DocumentOutcome> = pdfs
        .iter()
        .map(|pdf| DocumentOutcome {
            error: Some("build task panicked".to_string()),
            ..DocumentOutcome::new(pdf, &output_for(pdf), BuildStatus::Failed)
        })
        .collect();

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();
    for (index, pdf) in pdfs.into_iter().enumerate() {
        let sem = Arc::clone(&semaphore);
        let work = job(pdf);
        set.spawn(async move {
            let _permit = sem.acquire_owned().await;
            (index, work.await)
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
                outcomes[index] = outcome;
            }
            Err(error) => tracing::error!(%error, "build task did not complete"),
        }
    }

    let summary = BuildSummary::from_documents(outcomes);
    if summary.totals.failed > 0 {
        progress.finish_err("build finished with failures");
    } else {
        progress.finish_ok("done");
    }
    summary
}

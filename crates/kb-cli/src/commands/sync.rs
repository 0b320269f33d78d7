use anyhow::{Context, bail};
use kb_sync::{ChapterStats, RunSummary, SyncPipeline};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{SyncCommands, SyncTargetArgs};
use crate::context::AppContext;
use crate::output::output_report;
use crate::progress::Progress;

/// Handle `kbase sync`.
pub async fn handle(action: &SyncCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let target = match action {
        SyncCommands::Concepts(target) => target,
        SyncCommands::Questions(args) => &args.target,
    };
    let progress = Progress::spinner("syncing chapters");
    let pipeline = pipeline(target, ctx, &progress).await?;

    let summary = match action {
        SyncCommands::Concepts(target) => pipeline.sync_concepts(&target.input_dir).await,
        SyncCommands::Questions(args) => {
            pipeline
                .sync_questions(&args.target.input_dir, args.kind.into())
                .await
        }
    }
    .with_context(|| format!("failed to read {}", target.input_dir.display()))?;

    report(&summary, &progress, flags)
}

async fn pipeline(
    target: &SyncTargetArgs,
    ctx: &AppContext,
    progress: &Progress,
) -> anyhow::Result<SyncPipeline> {
    let service = ctx.service().await?;
    if service.get_subject(&target.subject_id).await?.is_none() {
        tracing::warn!(subject = %target.subject_id, "subject is not in the store; uploading anyway");
    }
    let bar = progress.handle();
    Ok(
        SyncPipeline::new(service, target.subject_id, ctx.upload_concurrency()).on_chapter_done(
            move |stats: &ChapterStats| {
                if let Some(bar) = &bar {
                    bar.set_message(format!("{} {}", stats.chapter, stats.kind));
                }
            },
        ),
    )
}

fn report(summary: &RunSummary, progress: &Progress, flags: &GlobalFlags) -> anyhow::Result<()> {
    if summary.has_failures() {
        progress.finish_err("sync finished with failures");
    } else {
        progress.finish_clear();
    }
    output_report(summary, &summary.chapters, &summary.totals, flags.format)?;

    if summary.has_failures() {
        bail!(
            "{} of {} chapter unit(s) failed",
            summary.totals.failed,
            summary.totals.chapters
        );
    }
    Ok(())
}

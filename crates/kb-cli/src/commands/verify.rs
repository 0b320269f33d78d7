use anyhow::{Context, bail};
use kb_verify::{Check, VerifyOptions, VerifyReport, Verifier};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::VerifyArgs;
use crate::context::AppContext;
use crate::output::output_report;
use crate::progress::Progress;

/// One chapter of one check, flattened for the table format.
#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    check: Check,
    chapter: &'a str,
    passed: bool,
    issues: &'a [String],
}

#[derive(Debug, Serialize)]
struct CheckTotals {
    check: Check,
    passed: usize,
    failed: usize,
}

/// Handle `kbase verify`.
pub async fn handle(args: &VerifyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let options = VerifyOptions {
        check_chapters: args.check_chapters,
        check_concepts: args.check_concepts,
        check_conventions: args.check_conventions,
        suggest: args.suggest,
        concurrency: ctx.generation_concurrency(),
    };
    let mut verifier = Verifier::new(options)?;
    if args.suggest {
        verifier = verifier.with_suggester(ctx.gemini()?);
    }

    let progress = Progress::spinner("verifying artifacts");
    let report = verifier
        .run(&args.input_dir)
        .await
        .with_context(|| format!("failed to verify {}", args.input_dir.display()))?;
    if report.has_failures() {
        progress.finish_err("verification found problems");
    } else {
        progress.finish_clear();
    }

    let (rows, totals) = table_view(&report);
    output_report(&report, &rows, &totals, flags.format)?;

    if report.has_failures() {
        let failed: usize = totals.iter().map(|t| t.failed).sum();
        bail!("verification failed for {failed} chapter outcome(s)");
    }
    Ok(())
}

fn table_view(report: &VerifyReport) -> (Vec<OutcomeRow<'_>>, Vec<CheckTotals>) {
    let rows = report
        .checks
        .iter()
        .flat_map(|check| {
            check.chapters.iter().map(|outcome| OutcomeRow {
                check: check.check,
                chapter: &outcome.prefix,
                passed: outcome.passed,
                issues: &outcome.issues,
            })
        })
        .collect();
    let totals = report
        .checks
        .iter()
        .map(|check| CheckTotals {
            check: check.check,
            passed: check.passed,
            failed: check.failed,
        })
        .collect();
    (rows, totals)
}

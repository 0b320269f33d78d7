use anyhow::{Context, bail};
use kb_artifact::migrate_directory;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MigrateArgs;
use crate::output::output;
use crate::progress::Progress;

/// Handle `kbase migrate`.
pub fn handle(args: &MigrateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner("migrating artifacts");
    let stats = migrate_directory(&args.input_dir, &args.output_dir, &args.subject_id)
        .with_context(|| format!("failed to migrate {}", args.input_dir.display()))?;

    if stats.has_errors() {
        progress.finish_err("migration finished with errors");
    } else {
        progress.finish_clear();
    }
    output(&stats, flags.format)?;

    if stats.has_errors() {
        bail!("{} file(s) failed to migrate", stats.errors.len());
    }
    Ok(())
}

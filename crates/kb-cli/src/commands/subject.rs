use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SubjectCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kbase subject`.
pub async fn handle(action: &SubjectCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = ctx.service().await?;
    match action {
        SubjectCommands::Add { class_id, name } => {
            let subject = service
                .create_subject(class_id, name)
                .await
                .with_context(|| format!("failed to add subject '{name}'"))?;
            output(&subject, flags.format)
        }
        SubjectCommands::List { class_id } => {
            output(&service.list_subjects(class_id).await?, flags.format)
        }
    }
}

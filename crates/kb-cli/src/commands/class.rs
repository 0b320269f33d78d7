use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ClassCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kbase class`.
pub async fn handle(action: &ClassCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = ctx.service().await?;
    match action {
        ClassCommands::Add {
            board_id,
            name,
            position,
        } => {
            let class = service
                .create_school_class(board_id, name, *position)
                .await
                .with_context(|| format!("failed to add class '{name}'"))?;
            output(&class, flags.format)
        }
        ClassCommands::List { board_id } => {
            output(&service.list_school_classes(board_id).await?, flags.format)
        }
    }
}

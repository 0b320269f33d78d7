use anyhow::{Context, bail};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BoardCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kbase board`.
pub async fn handle(action: &BoardCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = ctx.service().await?;
    match action {
        BoardCommands::Add { name, description } => {
            let board = service
                .create_board(name, description.as_deref())
                .await
                .with_context(|| format!("failed to create board '{name}'"))?;
            output(&board, flags.format)
        }
        BoardCommands::Get { id } => match service.get_board(id).await? {
            Some(board) => output(&board, flags.format),
            None => bail!("board {id} not found"),
        },
        BoardCommands::List { name } => {
            let boards = service.list_boards(name.as_deref()).await?;
            output(&boards, flags.format)
        }
    }
}

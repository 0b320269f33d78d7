use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Ids { action } => commands::ids::handle(&action, flags),
        Commands::Migrate(args) => commands::migrate::handle(&args, flags),
        Commands::Board { action } => commands::board::handle(&action, ctx, flags).await,
        Commands::Class { action } => commands::class::handle(&action, ctx, flags).await,
        Commands::Subject { action } => commands::subject::handle(&action, ctx, flags).await,
        Commands::Build { action } => commands::build::handle(&action, ctx, flags).await,
        Commands::Sync { action } => commands::sync::handle(&action, ctx, flags).await,
        Commands::Verify(args) => commands::verify::handle(&args, ctx, flags).await,
    }
}

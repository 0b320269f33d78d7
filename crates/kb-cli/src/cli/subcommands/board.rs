use clap::Subcommand;
use kb_core::ids::Id;

#[derive(Clone, Debug, Subcommand)]
pub enum BoardCommands {
    /// Create a board with a fresh random id.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show one board.
    Get {
        #[arg(long)]
        id: Id,
    },
    /// List boards, optionally filtered by a name fragment.
    List {
        #[arg(long)]
        name: Option<String>,
    },
}

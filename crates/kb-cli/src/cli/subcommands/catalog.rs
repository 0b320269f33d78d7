use clap::Subcommand;
use kb_core::ids::Id;

#[derive(Clone, Debug, Subcommand)]
pub enum ClassCommands {
    /// Create (or refresh) a class under an existing board.
    Add {
        #[arg(long)]
        board_id: Id,
        #[arg(long)]
        name: String,
        /// Sort order among the board's classes.
        #[arg(long, default_value_t = 0)]
        position: i64,
    },
    /// Classes of a board.
    List {
        #[arg(long)]
        board_id: Id,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum SubjectCommands {
    /// Create (or refresh) a subject under an existing class.
    Add {
        #[arg(long)]
        class_id: Id,
        #[arg(long)]
        name: String,
    },
    /// Subjects of a class.
    List {
        #[arg(long)]
        class_id: Id,
    },
}

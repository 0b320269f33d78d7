use std::path::PathBuf;

use clap::{Args, Subcommand};
use kb_core::ids::Id;

use crate::cli::subcommands::{
    BoardCommands, BuildCommands, ClassCommands, IdsCommands, SubjectCommands, SyncCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Compute hierarchy ids offline.
    Ids {
        #[command(subcommand)]
        action: IdsCommands,
    },
    /// Education boards.
    Board {
        #[command(subcommand)]
        action: BoardCommands,
    },
    /// School classes of a board.
    Class {
        #[command(subcommand)]
        action: ClassCommands,
    },
    /// Subjects of a class.
    Subject {
        #[command(subcommand)]
        action: SubjectCommands,
    },
    /// Add ids to artifacts written without them.
    Migrate(MigrateArgs),
    /// Generate artifacts from chapter PDFs.
    Build {
        #[command(subcommand)]
        action: BuildCommands,
    },
    /// Upload artifacts to the store.
    Sync {
        #[command(subcommand)]
        action: SyncCommands,
    },
    /// Check artifacts for consistency before syncing.
    Verify(VerifyArgs),
}

#[derive(Clone, Debug, Args)]
pub struct MigrateArgs {
    /// Directory with legacy concept tables and question banks.
    #[arg(long)]
    pub input_dir: PathBuf,
    /// Where identified copies are written.
    #[arg(long)]
    pub output_dir: PathBuf,
    #[arg(long)]
    pub subject_id: Id,
}

#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// Directory with concept tables and question banks.
    #[arg(long)]
    pub input_dir: PathBuf,
    /// Chapter name and id agreement across a chapter's files.
    #[arg(long)]
    pub check_chapters: bool,
    /// Concept names used by questions exist in the concept table.
    #[arg(long)]
    pub check_concepts: bool,
    /// Ask the AI service for replacements of missing concept names.
    #[arg(long, requires = "check_concepts")]
    pub suggest: bool,
    /// File prefixes, recorded positions, and sibling files.
    #[arg(long)]
    pub check_conventions: bool,
}

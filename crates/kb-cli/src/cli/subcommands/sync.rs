use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use kb_core::ids::Id;
use kb_sync::KindSelection;

#[derive(Clone, Debug, Subcommand)]
pub enum SyncCommands {
    /// Upload chapters, topics, and concepts from every concept table.
    Concepts(SyncTargetArgs),
    /// Upload question banks and their concept links.
    Questions(SyncQuestionsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SyncTargetArgs {
    /// Directory with identified artifacts.
    #[arg(long)]
    pub input_dir: PathBuf,
    #[arg(long)]
    pub subject_id: Id,
}

#[derive(Clone, Debug, Args)]
pub struct SyncQuestionsArgs {
    #[command(flatten)]
    pub target: SyncTargetArgs,
    #[arg(long, value_enum, default_value = "both")]
    pub kind: SyncKindArg,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SyncKindArg {
    Exercise,
    Solved,
    Both,
}

impl From<SyncKindArg> for KindSelection {
    fn from(value: SyncKindArg) -> Self {
        match value {
            SyncKindArg::Exercise => Self::Exercise,
            SyncKindArg::Solved => Self::Solved,
            SyncKindArg::Both => Self::Both,
        }
    }
}

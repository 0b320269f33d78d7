use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use kb_core::enums::QuestionKind;
use kb_core::ids::Id;

#[derive(Clone, Debug, Subcommand)]
pub enum BuildCommands {
    /// Extract concept tables from chapter PDFs.
    Concepts(BuildSourceArgs),
    /// Extract question banks from chapter PDFs.
    Questions(BuildQuestionsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct BuildSourceArgs {
    /// Directory of chapter PDFs, ideally named `NN_*.pdf`.
    #[arg(long)]
    pub pdf_dir: PathBuf,
    #[arg(long)]
    pub output_dir: PathBuf,
    #[arg(long)]
    pub subject_id: Id,
    /// Regenerate files that already exist.
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Clone, Debug, Args)]
pub struct BuildQuestionsArgs {
    #[command(flatten)]
    pub source: BuildSourceArgs,
    #[arg(long, value_enum)]
    pub kind: QuestionKindArg,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum QuestionKindArg {
    Exercise,
    Solved,
}

impl From<QuestionKindArg> for QuestionKind {
    fn from(value: QuestionKindArg) -> Self {
        match value {
            QuestionKindArg::Exercise => Self::Exercise,
            QuestionKindArg::Solved => Self::SolvedExample,
        }
    }
}

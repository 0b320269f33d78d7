use clap::{Args, Subcommand};
use kb_core::ids::Id;

/// Offline id computations.
#[derive(Clone, Debug, Subcommand)]
pub enum IdsCommands {
    /// School class id under a board.
    Class(DeriveArgs),
    /// Subject id under a school class.
    Subject(DeriveArgs),
    /// Chapter id under a subject.
    Chapter(DeriveArgs),
    /// Topic id under a chapter.
    Topic(DeriveArgs),
    /// Concept id under a topic.
    Concept(DeriveArgs),
    /// Question fingerprint under a subject.
    Question {
        #[arg(long)]
        subject_id: Id,
        /// Question text.
        #[arg(long)]
        text: String,
        #[arg(long)]
        explanation: Option<String>,
    },
    /// Report whether a value is a valid id.
    Check {
        value: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct DeriveArgs {
    /// Parent id.
    #[arg(long)]
    pub parent: Id,
    /// Child name, hashed exactly as given.
    #[arg(long)]
    pub name: String,
}

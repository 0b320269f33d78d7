mod board;
mod build;
mod catalog;
mod ids;
mod sync;

pub use board::BoardCommands;
pub use build::{BuildCommands, BuildSourceArgs};
pub use catalog::{ClassCommands, SubjectCommands};
pub use ids::{DeriveArgs, IdsCommands};
pub use sync::{SyncCommands, SyncTargetArgs};

#[cfg(test)]
pub use build::QuestionKindArg;
#[cfg(test)]
pub use sync::SyncKindArg;

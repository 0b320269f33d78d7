//! # kb-sync
//!
//! Pushes a directory of chapter artifacts into the store. Each chapter file
//! is an independent unit run under a concurrency bound; one unit failing
//! never stops the others. All writes are upserts keyed by deterministic ids,
//! so re-running a sync converges on the same rows.

pub mod concepts;
pub mod error;
pub mod pipeline;
pub mod questions;
pub mod stats;

pub use error::SyncError;
pub use pipeline::SyncPipeline;
pub use questions::{PreparedBank, prepare_bank};
pub use stats::{ChapterStats, KindSelection, RunSummary, SyncTarget, Totals};

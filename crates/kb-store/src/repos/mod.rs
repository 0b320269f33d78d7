//! Repository modules over the content tables.
//!
//! Each module adds methods to [`KbService`](crate::KbService) via `impl KbService` blocks.

pub mod catalog;
pub mod chapters;
pub mod concepts;
pub mod questions;

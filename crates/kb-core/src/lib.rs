//! # kb-core
//!
//! Core types, identifier derivation, and error types for kbase.
//!
//! This crate provides the foundational types shared across all kbase crates:
//! - The [`ids::Id`] type and the name-based derivation chain
//!   (board → class → subject → chapter → topic → concept, plus question and link ids)
//! - Content tree types extracted from textbooks (chapters, topics, concepts, questions)
//! - Row types mirrored in the remote store
//! - Question kind enum and question type normalization
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod question_type;
pub mod serde_util;

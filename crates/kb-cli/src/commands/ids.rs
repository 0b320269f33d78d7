use kb_core::ids::{self, Id};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{DeriveArgs, IdsCommands};
use crate::output::output;

#[derive(Debug, Serialize)]
struct DerivedId<'a> {
    parent: &'a Id,
    name: &'a str,
    id: Id,
}

#[derive(Debug, Serialize)]
struct IdCheck<'a> {
    value: &'a str,
    valid: bool,
}

/// Handle `kbase ids`.
pub fn handle(action: &IdsCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        IdsCommands::Class(args) => derived(args, ids::school_class_id, flags),
        IdsCommands::Subject(args) => derived(args, ids::subject_id, flags),
        IdsCommands::Chapter(args) => derived(args, ids::chapter_id, flags),
        IdsCommands::Topic(args) => derived(args, ids::topic_id, flags),
        IdsCommands::Concept(args) => derived(args, ids::concept_id, flags),
        IdsCommands::Question {
            subject_id,
            text,
            explanation,
        } => {
            let id = ids::question_id(subject_id, Some(text), explanation.as_deref());
            let response = DerivedId {
                parent: subject_id,
                name: text,
                id,
            };
            output(&response, flags.format)
        }
        IdsCommands::Check { value } => {
            let response = IdCheck {
                value,
                valid: ids::is_valid_id(value),
            };
            output(&response, flags.format)
        }
    }
}

fn derived(args: &DeriveArgs, derive: fn(&Id, &str) -> Id, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = DerivedId {
        parent: &args.parent,
        name: &args.name,
        id: derive(&args.parent, &args.name),
    };
    output(&response, flags.format)
}

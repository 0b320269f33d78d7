//! The independent checks. Each one turns discovered chapter files into a
//! [`CheckReport`](crate::report::CheckReport).

pub mod chapters;
pub mod concepts;
pub mod conventions;

use kb_core::enums::QuestionKind;

/// How a bank is named in issue messages.
pub(crate) const fn bank_label(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Exercise => "Exercise",
        QuestionKind::SolvedExample => "Solved",
    }
}

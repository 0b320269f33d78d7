use std::fmt;

/// Tables of the remote content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Boards,
    SchoolClasses,
    Subjects,
    Chapters,
    Topics,
    Concepts,
    BankQuestions,
    ConceptLinks,
}

impl Table {
    pub const ALL: [Self; 8] = [
        Self::Boards,
        Self::SchoolClasses,
        Self::Subjects,
        Self::Chapters,
        Self::Topics,
        Self::Concepts,
        Self::BankQuestions,
        Self::ConceptLinks,
    ];

    /// Table name on the wire and in SQL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boards => "boards",
            Self::SchoolClasses => "school_classes",
            Self::Subjects => "subjects",
            Self::Chapters => "chapters",
            Self::Topics => "topics",
            Self::Concepts => "concepts",
            Self::BankQuestions => "bank_questions",
            Self::ConceptLinks => "bank_questions_concepts_maps",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Concept names used by questions must exist in the chapter's concept table.

use std::collections::BTreeMap;

use kb_ai::{CatalogEntry, SuggestionRequest};
use kb_artifact::{ChapterFiles, QuestionBank, read_concept_rows, read_question_bank};
use kb_core::enums::QuestionKind;

use super::bank_label;
use crate::reconcile::{Classification, NameCatalog};
use crate::report::{ChapterOutcome, ConceptIssue, Proposal, ReferenceSource};

/// Questions per missing name sent to the suggester.
pub const QUESTIONS_PER_MISSING: usize = 3;

/// One chapter's concept check with what the suggestion step needs.
#[derive(Debug)]
pub struct ConceptFindings {
    pub outcome: ChapterOutcome,
    pub catalog: Vec<CatalogEntry>,
    pub banks: Vec<QuestionBank>,
}

/// Check every chapter that has a concept table.
#[must_use]
pub fn check_concepts(groups: &[ChapterFiles]) -> Vec<ConceptFindings> {
    groups
        .iter()
        .filter(|files| files.concepts.is_some())
        .map(check_chapter)
        .collect()
}

fn check_chapter(files: &ChapterFiles) -> ConceptFindings {
    let mut findings = ConceptFindings {
        outcome: ChapterOutcome::new(&files.prefix),
        catalog: Vec::new(),
        banks: Vec::new(),
    };
    let Some(path) = &files.concepts else {
        return findings;
    };
    match read_concept_rows(path) {
        Ok(rows) => {
            for row in rows {
                let name = row.concept_name.trim();
                if name.is_empty() || findings.catalog.iter().any(|e| e.name == name) {
                    continue;
                }
                findings.catalog.push(CatalogEntry {
                    name: name.to_string(),
                    description: row.concept_description.trim().to_string(),
                });
            }
        }
        Err(error) => {
            findings
                .outcome
                .fail(format!("Concept table unreadable: {error}"));
            return findings;
        }
    }

    for kind in QuestionKind::ALL {
        let Some(bank_path) = files.questions(kind) else {
            continue;
        };
        match read_question_bank(bank_path) {
            Ok(bank) => findings.banks.push(bank),
            Err(error) => findings
                .outcome
                .fail(format!("{} JSON unreadable: {error}", bank_label(kind))),
        }
    }

    let catalog = NameCatalog::new(findings.catalog.iter().map(|e| e.name.clone()));
    let mut referenced: BTreeMap<&str, ReferenceSource> = BTreeMap::new();
    for bank in &findings.banks {
        let source = ReferenceSource::of(bank.kind);
        for name in bank.questions.iter().flat_map(|q| &q.concepts) {
            if name.trim().is_empty() {
                continue;
            }
            referenced
                .entry(name.as_str())
                .and_modify(|s| *s = s.merge(source))
                .or_insert(source);
        }
    }

    let mut issues = Vec::new();
    for (name, source) in referenced {
        let classification = catalog.classify(name);
        if classification.is_exact() {
            continue;
        }
        let issue = ConceptIssue {
            name: name.to_string(),
            source,
            classification,
            proposals: Vec::new(),
        };
        findings.outcome.fail(issue.describe());
        issues.push(issue);
    }
    findings.outcome.concepts = issues;
    findings
}

/// A suggestion request and where its answer goes.
#[derive(Debug, Clone)]
pub struct SuggestionJob {
    pub chapter: usize,
    pub issue: usize,
    pub proposal: usize,
    pub request: SuggestionRequest,
}

/// Attach empty proposals to every missing name and return the requests
/// that would fill them.
pub fn plan_suggestions(findings: &mut [ConceptFindings]) -> Vec<SuggestionJob> {
    let mut jobs = Vec::new();
    for (chapter, finding) in findings.iter_mut().enumerate() {
        for (issue_index, issue) in finding.outcome.concepts.iter_mut().enumerate() {
            if !matches!(issue.classification, Classification::Missing { .. }) {
                continue;
            }
            let name = issue.name.clone();
            let source = issue.source;
            let using: Vec<_> = finding
                .banks
                .iter()
                .filter(|bank| source.includes(bank.kind))
                .flat_map(|bank| {
                    bank.questions
                        .iter()
                        .enumerate()
                        .map(move |(i, q)| (bank.kind, i + 1, q))
                })
                .filter(|(_, _, q)| q.concepts.contains(&name))
                .take(QUESTIONS_PER_MISSING)
                .collect();

            for (kind, question_index, question) in using {
                let question_text = question.question_text.clone().unwrap_or_default();
                jobs.push(SuggestionJob {
                    chapter,
                    issue: issue_index,
                    proposal: issue.proposals.len(),
                    request: SuggestionRequest {
                        missing_concept: name.clone(),
                        question_text: question_text.clone(),
                        current_concepts: question.concepts.clone(),
                        catalog: finding.catalog.clone(),
                    },
                });
                issue.proposals.push(Proposal {
                    kind,
                    question_index,
                    question_text,
                    suggested: None,
                });
            }
        }
    }
    jobs
}

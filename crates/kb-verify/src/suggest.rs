//! Ask the suggester for replacements of missing concept names.

use std::sync::Arc;

use kb_ai::ConceptSuggester;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::checks::concepts::{ConceptFindings, SuggestionJob};

/// Run every job with at most `concurrency` requests in flight and write the
/// answers into the planned proposals. A failed request leaves its proposal
/// without a suggestion.
pub async fn fill_suggestions(
    suggester: Arc<dyn ConceptSuggester>,
    findings: &mut [ConceptFindings],
    jobs: Vec<SuggestionJob>,
    concurrency: usize,
) {
    if jobs.is_empty() {
        return;
    }
    tracing::info!(requests = jobs.len(), concurrency, "requesting concept suggestions");

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();
    for job in jobs {
        let suggester = Arc::clone(&suggester);
        let sem = Arc::clone(&semaphore);
        set.spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return (job, None);
            };
            match suggester.suggest_concept(&job.request).await {
                Ok(suggested) => (job, suggested),
                Err(error) => {
                    tracing::warn!(concept = %job.request.missing_concept, %error, "concept suggestion failed");
                    (job, None)
                }
            }
        });
    }

    while let Some(joined) = set.join_next().await {
        let (job, suggested) = match joined {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(%error, "suggestion task did not complete");
                continue;
            }
        };
        if let Some(proposal) = findings
            .get_mut(job.chapter)
            .and_then(|f| f.outcome.concepts.get_mut(job.issue))
            .and_then(|issue| issue.proposals.get_mut(job.proposal))
        {
            proposal.suggested = suggested;
        }
    }
}

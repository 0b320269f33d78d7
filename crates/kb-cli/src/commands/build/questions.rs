use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use kb_ai::{Document, Extractor};
use kb_artifact::naming::{concepts_file_name, questions_file_name};
use kb_artifact::{QuestionBank, read_concept_table, write_question_bank};
use kb_core::enums::QuestionKind;
use kb_core::ids::Id;

use super::{BuildSummary, DocumentOutcome, SourcePdf, list_pdfs, run_jobs};
use crate::cli::subcommands::BuildSourceArgs;

/// Extract one question bank per PDF. Each chapter's concept table must
/// already be in `source.output_dir`.
pub(crate) async fn build_questions(
    extractor: Arc<dyn Extractor>,
    source: &BuildSourceArgs,
    kind: QuestionKind,
    concurrency: usize,
) -> anyhow::Result<BuildSummary> {
    let pdfs = list_pdfs(&source.pdf_dir)?;
    let out_dir = source.output_dir.clone();
    let subject = source.subject_id;
    let overwrite = source.overwrite;
    tracing::info!(documents = pdfs.len(), %kind, concurrency, "building question banks");

    let output_for = {
        let out_dir = out_dir.clone();
        move |pdf: &SourcePdf| out_dir.join(questions_file_name(&pdf.prefix, kind))
    };
    Ok(run_jobs(pdfs, concurrency, "extracting questions", output_for, |pdf| {
        let extractor = Arc::clone(&extractor);
        let out_dir = out_dir.clone();
        async move {
            let output = out_dir.join(questions_file_name(&pdf.prefix, kind));
            if !overwrite && output.exists() {
                return DocumentOutcome::skipped(&pdf, &output);
            }
            let table = out_dir.join(concepts_file_name(&pdf.prefix));
            let result = extract(extractor.as_ref(), &pdf, kind, &table, &output, &subject).await;
            DocumentOutcome::finish(&pdf, &output, result)
        }
    })
    .await)
}

async fn extract(
    extractor: &dyn Extractor,
    pdf: &SourcePdf,
    kind: QuestionKind,
    table_path: &Path,
    output: &Path,
    subject: &Id,
) -> anyhow::Result<usize> {
    if !table_path.exists() {
        bail!(
            "concept table {} is required; run `kbase build concepts` first",
            table_path.display()
        );
    }
    let table = read_concept_table(table_path)
        .with_context(|| format!("failed to read {}", table_path.display()))?;
    if table.subject_id != *subject {
        bail!(
            "concept table {} belongs to subject {}, not {subject}",
            table_path.display(),
            table.subject_id
        );
    }
    let names: Vec<String> = table.concept_names().map(String::from).collect();

    let document = Document::read_pdf(&pdf.path).await?;
    let extracted = extractor.extract_questions(kind, &document, &names).await?;
    if extracted.chapter_name.trim() != table.chapter.name {
        tracing::debug!(
            extracted = %extracted.chapter_name,
            table = %table.chapter.name,
            "using the concept table's chapter name"
        );
    }

    let count = extracted.questions.len();
    let bank = QuestionBank::new(table.chapter.name, kind, extracted.questions).identified(*subject);
    write_question_bank(output, &bank)?;
    Ok(count)
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kb_ai::{Document, Extractor};
use kb_artifact::naming::concepts_file_name;
use kb_artifact::write_concept_table;
use kb_core::ids::Id;

use super::{BuildSummary, DocumentOutcome, SourcePdf, list_pdfs, run_jobs};
use crate::cli::subcommands::BuildSourceArgs;

/// Extract a concept table from every PDF of `source.pdf_dir`.
pub(crate) async fn build_concepts(
    extractor: Arc<dyn Extractor>,
    source: &BuildSourceArgs,
    concurrency: usize,
) -> anyhow::Result<BuildSummary> {
    let pdfs = list_pdfs(&source.pdf_dir)?;
    let out_dir = source.output_dir.clone();
    let subject = source.subject_id;
    let overwrite = source.overwrite;
    tracing::info!(documents = pdfs.len(), concurrency, "building concept tables");

    let output_for = {
        let out_dir = out_dir.clone();
        move |pdf: &SourcePdf| out_dir.join(concepts_file_name(&pdf.prefix))
    };
    Ok(run_jobs(pdfs, concurrency, "extracting concepts", output_for, |pdf| {
        let extractor = Arc::clone(&extractor);
        let output = out_dir.join(concepts_file_name(&pdf.prefix));
        async move { build_one(extractor.as_ref(), &pdf, output, &subject, overwrite).await }
    })
    .await)
}

async fn build_one(
    extractor: &dyn Extractor,
    pdf: &SourcePdf,
    output: PathBuf,
    subject: &Id,
    overwrite: bool,
) -> DocumentOutcome {
    if !overwrite && output.exists() {
        return DocumentOutcome::skipped(pdf, &output);
    }
    let result = extract(extractor, pdf, &output, subject).await;
    DocumentOutcome::finish(pdf, &output, result)
}

async fn extract(
    extractor: &dyn Extractor,
    pdf: &SourcePdf,
    output: &Path,
    subject: &Id,
) -> anyhow::Result<usize> {
    let document = Document::read_pdf(&pdf.path).await?;
    let mut chapter = extractor.extract_chapter(&document).await?;
    if chapter.name.trim().is_empty() {
        tracing::warn!(pdf = %pdf.path.display(), "extracted chapter has no name; using the file title");
        chapter.name.clone_from(&pdf.title);
    }
    Ok(write_concept_table(output, &chapter, subject, pdf.position)?)
}

//! Prompt text sent to the model.

use std::fmt::Write as _;

use kb_core::enums::QuestionKind;

use crate::SuggestionRequest;

pub const CHAPTER_PROMPT: &str = "\
You are given one chapter of a school textbook as a PDF.

Extract its structure as Chapter -> Topics -> Concepts.

Rules:
- Use only what the PDF contains. Do not add outside knowledge.
- Name topics exactly as the chapter does, in the order they appear, numbering positions from 1.
- Split every topic into its smallest concepts. One concept is one idea, definition, fact, or procedure.
- Never merge two ideas into one concept and never repeat a concept that is explained again later.
- Examples, activities, tables, figures, and side boxes can each introduce concepts.
- page_number is the printed page where the concept first appears.
- Reply with JSON matching the response schema and nothing else.
";

/// Extraction prompt for one bank, with the chapter's concept names appended.
#[must_use]
pub fn questions_prompt(kind: QuestionKind, concept_names: &[String]) -> String {
    let what = match kind {
        QuestionKind::Exercise => "every exercise question at the end of the chapter or its sections",
        QuestionKind::SolvedExample => "every solved example worked inside the chapter",
    };
    let mut prompt = format!(
        "\
You are given one chapter of a school textbook as a PDF and the list of concepts it teaches.

Extract {what}.

Rules:
- Use only what the PDF contains. Copy question text faithfully; write math as plain text.
- Set question_type to one of mcq4, msq4, truefalse, fillintheblank, matchthefollowing, shortanswer, longanswer.
- Fill option1..option4 and correct_mcq_option for mcq4; msq_option*_answer for msq4; istrue for truefalse.
- Put the worked solution or reasoning in explanation and the final answer in answer_text.
- hardness_level is easy, medium, or hard.
- Set is_image_needed to 1 when the question cannot be answered without a figure.
- List in concepts the names of the concepts the question exercises, copied exactly from the list below.
- Reply with JSON matching the response schema and nothing else.
"
    );
    if !concept_names.is_empty() {
        prompt.push_str("\nCONCEPTS:\n");
        for name in concept_names {
            let _ = writeln!(prompt, "- {name}");
        }
    }
    prompt
}

/// Ask for the catalog entry a question should have referenced instead.
#[must_use]
pub fn suggestion_prompt(request: &SuggestionRequest) -> String {
    let mut catalog = String::new();
    for entry in &request.catalog {
        if entry.description.is_empty() {
            let _ = writeln!(catalog, "- {}", entry.name);
        } else {
            let _ = writeln!(catalog, "- {}: {}", entry.name, entry.description);
        }
    }
    let current = if request.current_concepts.is_empty() {
        "none".to_string()
    } else {
        request.current_concepts.join(", ")
    };

    format!(
        "\
A question is tagged with the concept \"{missing}\", which is not in the chapter's concept list.

QUESTION:
{question}

CURRENT TAGS:
{current}

CHAPTER CONCEPTS (name: description):
{catalog}
Answer with the single concept name from the list that should replace \"{missing}\".
Copy the name exactly as written before the colon. Give no description or explanation.
If nothing in the list fits, answer NONE.
",
        missing = request.missing_concept,
        question = request.question_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogEntry;

    #[test]
    fn questions_prompt_lists_concepts() {
        let prompt = questions_prompt(
            QuestionKind::SolvedExample,
            &["Place Value".to_string(), "Estimation".to_string()],
        );
        assert!(prompt.contains("solved example"));
        assert!(prompt.ends_with("CONCEPTS:\n- Place Value\n- Estimation\n"));
    }

    #[test]
    fn suggestion_prompt_formats_catalog() {
        let request = SuggestionRequest {
            missing_concept: "Ratios".into(),
            question_text: "Simplify 4:6".into(),
            current_concepts: vec!["Ratios".into()],
            catalog: vec![
                CatalogEntry {
                    name: "Ratio".into(),
                    description: "Comparison by division".into(),
                },
                CatalogEntry {
                    name: "Proportion".into(),
                    description: String::new(),
                },
            ],
        };
        let prompt = suggestion_prompt(&request);
        assert!(prompt.contains("- Ratio: Comparison by division\n- Proportion\n"));
        assert!(prompt.contains("CURRENT TAGS:\nRatios\n"));
        assert!(prompt.contains("answer NONE"));
    }
}

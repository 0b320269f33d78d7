//! A directory written by the codec is discovered and read back intact.

use kb_artifact::naming::{chapter_prefix, concepts_file_name, questions_file_name};
use kb_artifact::{
    QuestionBank, discover, read_concept_rows, read_concept_table, read_question_bank,
    write_concept_table, write_question_bank,
};
use kb_core::entities::{Chapter, Concept, Question, Topic};
use kb_core::enums::QuestionKind;
use kb_core::ids::Id;
use pretty_assertions::assert_eq;

fn subject() -> Id {
    Id::parse("3c0f5e1a-8d3b-4f5e-9b1a-2d4c6e8f0a12").unwrap()
}

fn chapter(name: &str, concepts: &[&str]) -> Chapter {
    Chapter {
        name: name.to_string(),
        description: String::new(),
        topics: vec![Topic {
            name: "Main".into(),
            description: String::new(),
            position: 1,
            concepts: concepts
                .iter()
                .enumerate()
                .map(|(i, name)| Concept {
                    name: (*name).to_string(),
                    description: String::new(),
                    page_number: i64::try_from(i).unwrap() + 1,
                })
                .collect(),
        }],
    }
}

#[test]
fn full_chapter_directory() {
    let dir = tempfile::tempdir().unwrap();
    let chapters = [
        (1, chapter("Knowing Our Numbers", &["Place Value", "Estimation"])),
        (2, chapter("Whole Numbers", &["Predecessor", "Successor"])),
    ];

    for (position, tree) in &chapters {
        let prefix = chapter_prefix(*position, &tree.name);
        write_concept_table(
            &dir.path().join(concepts_file_name(&prefix)),
            tree,
            &subject(),
            *position,
        )
        .unwrap();

        let bank = QuestionBank::new(
            tree.name.clone(),
            QuestionKind::Exercise,
            vec![Question {
                question_text: Some(format!("A question about {}", tree.name)),
                concepts: tree.concept_names().map(str::to_string).collect(),
                ..Question::default()
            }],
        )
        .identified(subject());
        write_question_bank(
            &dir.path().join(questions_file_name(&prefix, QuestionKind::Exercise)),
            &bank,
        )
        .unwrap();
    }

    let found = discover(dir.path()).unwrap();
    assert_eq!(
        found.iter().map(|c| c.prefix.as_str()).collect::<Vec<_>>(),
        vec!["01_knowing_our_numbers", "02_whole_numbers"]
    );

    for (files, (position, tree)) in found.iter().zip(&chapters) {
        let concepts = files.concepts.as_deref().unwrap();
        assert_eq!(read_concept_rows(concepts).unwrap().len(), 2);

        let table = read_concept_table(concepts).unwrap();
        assert_eq!(table.chapter.position, *position);
        assert_eq!(&table.to_tree(), tree);

        let bank = read_question_bank(files.questions(QuestionKind::Exercise).unwrap()).unwrap();
        assert_eq!(bank.chapter_id, Some(table.chapter.id));
        assert_eq!(bank.questions[0].concepts.len(), 2);
        assert!(files.solved.is_none());
    }
}

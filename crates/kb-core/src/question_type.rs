//! Normalization of free-form question type labels into stored values.

/// Map a question type label to the value stored remotely.
///
/// Known aliases collapse to `mcq4`, `msq4`, `short_answer`, `long_answer`,
/// `true_or_false`, `fill_in_the_blanks`, and `match_the_following`. Unknown
/// labels are lowercased with spaces turned into underscores. Blank input has
/// no type.
#[must_use]
pub fn normalize_question_type(raw: Option<&str>) -> Option<String> {
    let lowered = raw?.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let mapped = match lowered.as_str() {
        "mcq" | "mcq4" | "multiple choice" => "mcq4",
        "msq" | "msq4" | "multiple select" => "msq4",
        "short answer" | "shortanswer" | "short_answer" => "short_answer",
        "long answer" | "longanswer" | "long_answer" => "long_answer",
        "true false" | "true/false" | "true or false" | "truefalse" => "true_or_false",
        "fill in the blanks" | "fill_in_the_blanks" | "fillintheblank" | "fillintheblanks" => {
            "fill_in_the_blanks"
        }
        "match" | "match the following" | "match_the_following" | "matchthefollowing"
        | "maththefollowing" => "match_the_following",
        other => return Some(other.replace(' ', "_")),
    };
    Some(mapped.to_string())
}

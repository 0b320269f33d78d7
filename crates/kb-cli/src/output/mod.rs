use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(value)?)),
    }
}

/// Print a serializable response to stdout.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print a report whose per-chapter rows are the interesting part.
///
/// JSON formats print `value` whole; the table format prints `rows` as a table
/// followed by `totals` as key/value pairs.
pub fn output_report<T, R, S>(value: &T, rows: &R, totals: &S, format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize,
    R: Serialize,
    S: Serialize,
{
    if format != OutputFormat::Table {
        return output(value, format);
    }
    println!("{}", render_table(&serde_json::to_value(rows)?));
    println!();
    println!("{}", render_table(&serde_json::to_value(totals)?));
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(items) => render_list(items),
        Value::Object(map) => render_pairs(map),
        scalar => table::render_rows(&["value"], &[vec![cell(scalar)]], options()),
    }
}

fn render_pairs(map: &Map<String, Value>) -> String {
    let rows: Vec<Vec<String>> = map
        .iter()
        .map(|(key, value)| vec![key.clone(), cell(value)])
        .collect();
    table::render_rows(&["key", "value"], &rows, options())
}

/// One row per item; columns are the union of keys, sorted.
fn render_list(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows: Vec<Vec<String>> = items.iter().map(|item| vec![cell(item)]).collect();
        return table::render_rows(&["value"], &rows, options());
    }

    let mut headers: Vec<&str> = Vec::new();
    for key in items.iter().filter_map(Value::as_object).flat_map(Map::keys) {
        if !headers.contains(&key.as_str()) {
            headers.push(key);
        }
    }
    headers.sort_unstable();
    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), cell))
                .collect()
        })
        .collect();
    table::render_rows(&headers, &rows, options())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Array(items) => items.len().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        chapter: &'static str,
        upserted: u32,
        unresolved: Vec<&'static str>,
        error: Option<&'static str>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                chapter: "01_fractions",
                upserted: 12,
                unresolved: vec!["Ratios", "Area"],
                error: None,
            },
            Row {
                chapter: "02_integers",
                upserted: 0,
                unresolved: vec![],
                error: Some("subject mismatch"),
            },
        ]
    }

    #[test]
    fn json_is_pretty_and_raw_is_one_line() {
        let pretty = render(&rows(), OutputFormat::Json).unwrap();
        let raw = render(&rows(), OutputFormat::Raw).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!raw.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[1]["error"], "subject mismatch");
    }

    #[test]
    fn list_table_sorts_columns_and_flattens_cells() {
        let out = render(&rows(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        let header: Vec<&str> = lines[0].split_whitespace().collect();
        assert_eq!(header, vec!["chapter", "error", "unresolved", "upserted"]);
        assert!(lines[2].contains("Ratios; Area"));
        assert!(lines[2].ends_with("12"));
        assert!(lines[3].contains("subject mismatch"));
        assert!(lines[3].ends_with('0'));
    }

    #[test]
    fn empty_list_says_so() {
        let out = render(&Vec::<Row>::new(), OutputFormat::Table).unwrap();
        assert_eq!(out, "(no rows)");
    }
}

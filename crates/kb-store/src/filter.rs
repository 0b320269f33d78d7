//! Row filters understood by every backend.

use serde_json::Value;

use crate::Row;

/// A single column predicate. Filters passed together are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Column equals the value.
    Eq { column: String, value: String },
    /// Column contains the text, ignoring case.
    ILike { column: String, text: String },
    /// Column equals one of the values. An empty list matches nothing.
    In { column: String, values: Vec<String> },
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self::Eq {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn contains_ci(column: &str, text: impl ToString) -> Self {
        Self::ILike {
            column: column.to_string(),
            text: text.to_string(),
        }
    }

    pub fn is_in<I, T>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::In {
            column: column.to_string(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::ILike { column, .. } | Self::In { column, .. } => {
                column
            }
        }
    }

    /// A membership filter over nothing; callers can skip the round trip.
    #[must_use]
    pub fn is_empty_in(&self) -> bool {
        matches!(self, Self::In { values, .. } if values.is_empty())
    }

    /// Evaluate against a row held in memory.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let Some(cell) = row.get(self.column()).and_then(cell_text) else {
            return false;
        };
        match self {
            Self::Eq { value, .. } => cell == *value,
            Self::ILike { text, .. } => cell.to_lowercase().contains(&text.to_lowercase()),
            Self::In { values, .. } => values.iter().any(|v| *v == cell),
        }
    }

    /// The PostgREST operator expression for this filter, e.g. `eq.abc`.
    #[must_use]
    pub fn postgrest_expr(&self) -> String {
        match self {
            Self::Eq { value, .. } => format!("eq.{value}"),
            Self::ILike { text, .. } => format!("ilike.*{text}*"),
            Self::In { values, .. } => {
                let quoted = values
                    .iter()
                    .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("in.({quoted})")
            }
        }
    }
}

/// Text form of a scalar cell. Nulls and nested values never match.
pub(crate) fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

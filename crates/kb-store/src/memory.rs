//! In-memory backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::table::Table;
use crate::{RemoteStore, Row, row_id};

/// Process-local tables keyed by row id.
///
/// Rows come back in id order so results are stable across runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, BTreeMap<String, Row>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently in `table`.
    #[must_use]
    pub fn len(&self, table: Table) -> usize {
        self.tables
            .read()
            .map(|tables| tables.get(&table).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self, table: Table) -> bool {
        self.len(table) == 0
    }

    fn poisoned() -> StoreError {
        StoreError::Decode("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables
            .get(&table)
            .map(|rows| {
                rows.values()
                    .filter(|row| filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upsert(&self, table: Table, rows: &[Row]) -> Result<usize, StoreError> {
        let keyed = rows
            .iter()
            .map(|row| Ok((row_id(row)?, row.clone())))
            .collect::<Result<Vec<_>, StoreError>>()?;

        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let stored = tables.entry(table).or_default();
        for (id, row) in keyed {
            stored.insert(id, row);
        }
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let store = MemoryStore::new();
        store
            .upsert(Table::Boards, &[row(json!({"id": "b1", "name": "CBSE"}))])
            .await
            .unwrap();
        store
            .upsert(Table::Boards, &[row(json!({"id": "b1", "name": "CBSE (new)"}))])
            .await
            .unwrap();

        let rows = store.select(Table::Boards, &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "CBSE (new)");
    }

    #[tokio::test]
    async fn row_without_id_is_rejected_and_nothing_written() {
        let store = MemoryStore::new();
        let err = store
            .upsert(
                Table::Topics,
                &[row(json!({"id": "t1"})), row(json!({"name": "no id"}))],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(store.is_empty(Table::Topics));
    }

    #[tokio::test]
    async fn select_applies_all_filters() {
        let store = MemoryStore::new();
        store
            .upsert(
                Table::Chapters,
                &[
                    row(json!({"id": "c1", "subject_id": "s1", "name": "Fractions"})),
                    row(json!({"id": "c2", "subject_id": "s1", "name": "Decimals"})),
                    row(json!({"id": "c3", "subject_id": "s2", "name": "Fractions"})),
                ],
            )
            .await
            .unwrap();

        let rows = store
            .select(
                Table::Chapters,
                &[Filter::eq("subject_id", "s1"), Filter::contains_ci("name", "frac")],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "c1");
    }
}

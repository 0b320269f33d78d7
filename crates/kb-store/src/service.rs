//! Typed access to a [`RemoteStore`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::table::Table;
use crate::{RemoteStore, from_row, to_row};

/// Ids per membership filter. Keeps PostgREST query strings well under URL limits.
const IN_CHUNK: usize = 100;

/// Repository entry point shared by every command.
///
/// Cheap to clone; each repository module adds methods via `impl KbService`.
#[derive(Clone)]
pub struct KbService {
    store: Arc<dyn RemoteStore>,
}

impl KbService {
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &dyn RemoteStore {
        self.store.as_ref()
    }

    /// Select and decode rows of `table`.
    ///
    /// # Errors
    ///
    /// Store failures, or [`StoreError::Decode`] when a row does not fit `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        table: Table,
        filters: &[Filter],
    ) -> Result<Vec<T>, StoreError> {
        self.store
            .select(table, filters)
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    /// Select rows whose `column` is any of `values`, in chunks.
    ///
    /// # Errors
    ///
    /// The first failing chunk's error.
    pub async fn fetch_in<T: DeserializeOwned>(
        &self,
        table: Table,
        column: &str,
        values: &[String],
    ) -> Result<Vec<T>, StoreError> {
        let mut out = Vec::new();
        for chunk in values.chunks(IN_CHUNK) {
            out.extend(
                self.fetch::<T>(table, &[Filter::is_in(column, chunk)])
                    .await?,
            );
        }
        Ok(out)
    }

    /// Serialize and upsert `rows` as one batch.
    ///
    /// # Errors
    ///
    /// Serialization or store failures.
    pub async fn put<T: Serialize>(&self, table: Table, rows: &[T]) -> Result<usize, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let rows = rows.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;
        self.store.upsert(table, &rows).await
    }
}

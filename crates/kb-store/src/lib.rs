//! # kb-store
//!
//! The remote content store as a table service: `select` rows with simple
//! filters and `upsert` rows keyed by `id`. Nothing is ever deleted and no
//! transaction spans tables.
//!
//! Backends:
//! - [`PostgrestStore`]: a PostgREST endpoint such as a Supabase project
//! - [`LibsqlStore`]: a local libSQL file, one JSON document per row
//! - [`MemoryStore`]: process-local tables for tests and dry runs
//!
//! [`KbService`] layers typed repositories (boards, classes, subjects,
//! chapters, concept lookups) on top of any backend.

pub mod error;
pub mod filter;
mod http;
mod local;
mod memory;
mod migrations;
mod postgrest;
pub mod repos;
pub mod service;
pub mod table;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use kb_config::{StoreBackend, StoreConfig};

pub use error::StoreError;
pub use filter::Filter;
pub use local::LibsqlStore;
pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use service::KbService;
pub use table::Table;

/// One table row as a JSON object.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A key-addressable table service.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Rows of `table` matching every filter.
    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>, StoreError>;

    /// Create-or-replace `rows` by their `id`. Returns how many rows were sent.
    async fn upsert(&self, table: Table, rows: &[Row]) -> Result<usize, StoreError>;
}

/// Open the backend named in `config`.
///
/// # Errors
///
/// Returns [`StoreError::NotConfigured`] when the backend lacks credentials,
/// or a libSQL error when the local database cannot be opened.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn RemoteStore>, StoreError> {
    if !config.is_configured() {
        return Err(StoreError::NotConfigured(format!(
            "{:?} backend is missing url or service key",
            config.backend
        )));
    }
    let store: Arc<dyn RemoteStore> = match config.backend {
        StoreBackend::Postgrest => Arc::new(PostgrestStore::new(&config.url, &config.service_key)?),
        StoreBackend::Libsql => Arc::new(LibsqlStore::open(&config.local_path).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::debug!(backend = store.backend(), "opened store");
    Ok(store)
}

/// Serialize a typed value into a row.
///
/// # Errors
///
/// Fails when the value does not serialize to a JSON object.
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Decode(format!(
            "expected an object row, got {other}"
        ))),
    }
}

/// Deserialize a row into a typed value.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] when the row does not fit `T`.
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(row))
        .map_err(|e| StoreError::Decode(e.to_string()))
}

/// The `id` of a row as text.
pub(crate) fn row_id(row: &Row) -> Result<String, StoreError> {
    row.get("id")
        .and_then(filter::cell_text)
        .ok_or_else(|| StoreError::Decode("row has no id".to_string()))
}

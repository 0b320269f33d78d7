//! Schema for the libSQL backend, embedded at compile time.
//!
//! Every statement uses `IF NOT EXISTS`, so opening an existing file re-runs safely.

use crate::error::StoreError;

const MIGRATION_001: &str = include_str!("../migrations/001_tables.sql");

pub(crate) async fn run(conn: &libsql::Connection) -> Result<(), StoreError> {
    conn.execute_batch(MIGRATION_001)
        .await
        .map_err(|e| StoreError::Migration(format!("001_tables: {e}")))?;
    Ok(())
}

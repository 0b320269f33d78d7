//! libSQL backend: a local file holding each row as a JSON document.

use async_trait::async_trait;
use libsql::Builder;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::table::Table;
use crate::{RemoteStore, Row, migrations, row_id};

pub struct LibsqlStore {
    #[allow(dead_code)]
    db: libsql::Database,
    /// Serializes writers so concurrent chapters never interleave transactions.
    conn: Mutex<libsql::Connection>,
}

impl LibsqlStore {
    /// Open (or create) the database at `path`. `":memory:"` gives a scratch store.
    ///
    /// # Errors
    ///
    /// Returns a libSQL error if the file cannot be opened, or
    /// [`StoreError::Migration`] if the schema cannot be created.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && path != ":memory:"
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Migration(format!("create {}: {e}", parent.display())))?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        migrations::run(&conn).await?;
        Ok(Self {
            db,
            conn: Mutex::new(conn),
        })
    }
}

/// SQL `WHERE` clause and parameters for the filters SQL can evaluate.
///
/// Equality and membership run in SQL; case-insensitive substring filters are
/// applied to the decoded rows, where Unicode case folding is available.
fn where_clause(filters: &[Filter]) -> (String, Vec<libsql::Value>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for filter in filters {
        match filter {
            Filter::Eq { column, value } => {
                params.push(libsql::Value::Text(format!("$.{column}")));
                params.push(libsql::Value::Text(value.clone()));
                clauses.push(format!(
                    "CAST(json_extract(data, ?{}) AS TEXT) = ?{}",
                    params.len() - 1,
                    params.len()
                ));
            }
            Filter::In { column, values } => {
                params.push(libsql::Value::Text(format!("$.{column}")));
                let path_idx = params.len();
                let placeholders = values
                    .iter()
                    .map(|value| {
                        params.push(libsql::Value::Text(value.clone()));
                        format!("?{}", params.len())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                clauses.push(format!(
                    "CAST(json_extract(data, ?{path_idx}) AS TEXT) IN ({placeholders})"
                ));
            }
            Filter::ILike { .. } => {}
        }
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

#[async_trait]
impl RemoteStore for LibsqlStore {
    fn backend(&self) -> &'static str {
        "libsql"
    }

    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        if filters.iter().any(Filter::is_empty_in) {
            return Ok(Vec::new());
        }

        let (clause, params) = where_clause(filters);
        let sql = format!("SELECT data FROM {}{clause} ORDER BY id", table.as_str());

        let conn = self.conn.lock().await;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let data = row.get::<String>(0)?;
            let decoded: Row =
                serde_json::from_str(&data).map_err(|e| StoreError::Decode(e.to_string()))?;
            if filters.iter().all(|f| !matches!(f, Filter::ILike { .. }) || f.matches(&decoded)) {
                out.push(decoded);
            }
        }
        Ok(out)
    }

    async fn upsert(&self, table: Table, rows: &[Row]) -> Result<usize, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let encoded = rows
            .iter()
            .map(|row| Ok((row_id(row)?, serde_json::to_string(row)?)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        let sql = format!(
            "INSERT INTO {} (id, data) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
            table.as_str()
        );

        let conn = self.conn.lock().await;
        let tx = conn.transaction().await?;
        for (id, data) in encoded {
            tx.execute(&sql, libsql::params![id, data]).await?;
        }
        tx.commit().await?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn test_store() -> LibsqlStore {
        LibsqlStore::open(":memory:").await.unwrap()
    }

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn open_creates_every_table() {
        let store = test_store().await;
        for table in Table::ALL {
            let rows = store.select(table, &[]).await.unwrap();
            assert!(rows.is_empty(), "{table} should start empty");
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let store = test_store().await;
        let rows = [
            row(json!({"id": "t1", "chapter_id": "c1", "name": "Types", "position": 1})),
            row(json!({"id": "t2", "chapter_id": "c1", "name": "Operations", "position": 2})),
        ];
        assert_eq!(store.upsert(Table::Topics, &rows).await.unwrap(), 2);
        assert_eq!(store.upsert(Table::Topics, &rows).await.unwrap(), 2);
        assert_eq!(store.select(Table::Topics, &[]).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn filters_run_in_sql_and_after_decode() {
        let store = test_store().await;
        store
            .upsert(
                Table::Chapters,
                &[
                    row(json!({"id": "c1", "subject_id": "s1", "name": "Fractions", "position": 7})),
                    row(json!({"id": "c2", "subject_id": "s1", "name": "Decimals", "position": 8})),
                    row(json!({"id": "c3", "subject_id": "s2", "name": "Fractions", "position": 1})),
                ],
            )
            .await
            .unwrap();

        let by_subject = store
            .select(Table::Chapters, &[Filter::eq("subject_id", "s1")])
            .await
            .unwrap();
        assert_eq!(by_subject.len(), 2);

        let by_position = store
            .select(Table::Chapters, &[Filter::eq("position", 8)])
            .await
            .unwrap();
        assert_eq!(by_position[0]["id"], "c2");

        let in_list = store
            .select(
                Table::Chapters,
                &[Filter::is_in("id", ["c1", "c3"]), Filter::contains_ci("name", "FRAC")],
            )
            .await
            .unwrap();
        assert_eq!(in_list.len(), 2);
    }
}

//! PostgREST backend (Supabase and friends).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::http::check_response;
use crate::table::Table;
use crate::{RemoteStore, Row};

/// Rows per select page. Matches the default `max-rows` of hosted PostgREST.
const PAGE_SIZE: usize = 1000;

/// Talks to `{url}/rest/v1/{table}` with a service key.
pub struct PostgrestStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl PostgrestStore {
    /// Build a client for the project at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str, service_key: &str) -> Result<Self, StoreError> {
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent("kbase/0.1")
                .timeout(Duration::from_secs(60))
                .build()?,
            base_url: url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_str())
    }

    /// Full select URL for one page.
    pub(crate) fn select_url(&self, table: Table, filters: &[Filter], offset: usize) -> String {
        let mut url = format!(
            "{}?select=*&order=id.asc&limit={PAGE_SIZE}&offset={offset}",
            self.table_url(table)
        );
        for filter in filters {
            url.push('&');
            url.push_str(&urlencoding::encode(filter.column()));
            url.push('=');
            url.push_str(&urlencoding::encode(&filter.postgrest_expr()));
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

#[async_trait]
impl RemoteStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        if filters.iter().any(Filter::is_empty_in) {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        loop {
            let url = self.select_url(table, filters, rows.len());
            let resp = self.authorized(self.http.get(&url)).send().await?;
            let page: Vec<Row> = check_response(resp).await?.json().await?;
            let done = page.len() < PAGE_SIZE;
            rows.extend(page);
            if done {
                break;
            }
        }
        tracing::debug!(%table, rows = rows.len(), "postgrest select");
        Ok(rows)
    }

    async fn upsert(&self, table: Table, rows: &[Row]) -> Result<usize, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let resp = self
            .authorized(self.http.post(self.table_url(table)))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await?;
        check_response(resp).await?;
        tracing::debug!(%table, rows = rows.len(), "postgrest upsert");
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_url_encodes_filters() {
        let store = PostgrestStore::new("https://abcd.supabase.co/", "key").unwrap();
        let url = store.select_url(
            Table::Chapters,
            &[
                Filter::eq("subject_id", "s-1"),
                Filter::contains_ci("name", "Whole Numbers"),
            ],
            0,
        );
        assert_eq!(
            url,
            "https://abcd.supabase.co/rest/v1/chapters?select=*&order=id.asc&limit=1000&offset=0\
             &subject_id=eq.s-1&name=ilike.%2AWhole%20Numbers%2A"
        );
    }

    #[test]
    fn select_url_pages_by_offset() {
        let store = PostgrestStore::new("https://abcd.supabase.co", "key").unwrap();
        let url = store.select_url(Table::ConceptLinks, &[], 2000);
        assert!(url.starts_with("https://abcd.supabase.co/rest/v1/bank_questions_concepts_maps?"));
        assert!(url.contains("offset=2000"));
    }

    #[tokio::test]
    async fn empty_membership_short_circuits() {
        let store = PostgrestStore::new("http://127.0.0.1:9", "key").unwrap();
        let rows = store
            .select(Table::Topics, &[Filter::is_in("chapter_id", Vec::<String>::new())])
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn empty_upsert_sends_nothing() {
        let store = PostgrestStore::new("http://127.0.0.1:9", "key").unwrap();
        assert_eq!(store.upsert(Table::Concepts, &[]).await.unwrap(), 0);
    }
}

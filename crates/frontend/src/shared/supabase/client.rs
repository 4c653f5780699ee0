use super::error::StoreError;
use super::postgrest::{error_message, parse_content_range, render_url};
use crate::shared::config::Config;
use async_trait::async_trait;
use contracts::domain::a002_sale::{NewSale, Sale};
use contracts::shared::store_query::{Collection, PageWindow, QueryResult, StoreQuery};
use contracts::usecases::u501_check_email::CheckEmailResponse;
use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reads and writes against the sales store
#[async_trait(?Send)]
pub trait SalesStore {
    /// Run a read; `total` is filled when the query asked for an exact count
    async fn select(&self, query: &StoreQuery) -> Result<QueryResult<Value>, StoreError>;

    /// Insert one sale and return the stored row
    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, StoreError>;
}

/// Trigger of the serverless mail checker
#[async_trait(?Send)]
pub trait MailIngestion {
    async fn check_email(&self) -> Result<CheckEmailResponse, StoreError>;
}

/// Typed read: decode every row into `T`
pub async fn fetch<T, S>(store: &S, query: &StoreQuery) -> Result<QueryResult<T>, StoreError>
where
    T: DeserializeOwned,
    S: SalesStore + ?Sized,
{
    store
        .select(query)
        .await?
        .map_rows(|row| serde_json::from_value::<T>(row).map_err(StoreError::decode))
}

/// Rows per request of [`fetch_all`]; matches the default PostgREST `max-rows`
pub const FETCH_PAGE_SIZE: u64 = 1000;

/// Typed read of the whole filtered set.
///
/// The server silently caps every response at `max-rows`, so aggregates
/// that need every row walk the set in windows until the exact count is
/// reached. Without an explicit order the windows are ordered by `id`.
pub async fn fetch_all<T, S>(store: &S, query: &StoreQuery) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    S: SalesStore + ?Sized,
{
    let mut query = query.clone();
    if query.order.is_none() {
        query = query.order_by("id", true);
    }
    query.limit = None;
    query.count_exact = true;

    let mut rows = Vec::new();
    loop {
        query.window = Some(PageWindow {
            offset: rows.len() as u64,
            limit: FETCH_PAGE_SIZE,
        });
        let result = fetch::<T, S>(store, &query).await?;
        let more = result.has_next();
        if result.rows.is_empty() {
            break;
        }
        rows.extend(result.rows);
        if !more {
            break;
        }
    }
    Ok(rows)
}

/// PostgREST + Edge Functions client authenticated with the public anon key
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    rest_url: String,
    ingestion_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> Self {
        Self {
            rest_url: config.rest_url(),
            ingestion_url: config.ingestion_url(),
            anon_key: config.supabase.anon_key.clone(),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
    }

    async fn check_status(response: Response) -> Result<Response, StoreError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Http {
            status,
            message: error_message(&body),
        })
    }
}

#[async_trait(?Send)]
impl SalesStore for SupabaseClient {
    async fn select(&self, query: &StoreQuery) -> Result<QueryResult<Value>, StoreError> {
        let url = render_url(&self.rest_url, query);
        log::debug!("GET {}", url);

        let mut request = self.authorize(gloo_net::http::Request::get(&url));
        if query.count_exact {
            request = request.header("Prefer", "count=exact");
        }

        let response = request.send().await.map_err(StoreError::network)?;
        let response = Self::check_status(response).await?;

        let total = if query.count_exact {
            response
                .headers()
                .get("content-range")
                .as_deref()
                .and_then(parse_content_range)
        } else {
            None
        };

        let rows: Vec<Value> = response.json().await.map_err(StoreError::decode)?;
        Ok(QueryResult {
            rows,
            total,
            window: query.window,
        })
    }

    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, StoreError> {
        let url = format!(
            "{}/{}?select=*,platforms(name)",
            self.rest_url,
            Collection::Sales.name()
        );

        let request = self
            .authorize(gloo_net::http::Request::post(&url))
            .header("Prefer", "return=representation")
            .json(sale)
            .map_err(StoreError::decode)?;

        let response = request.send().await.map_err(StoreError::network)?;
        let response = Self::check_status(response).await?;

        // PostgREST returns the inserted rows as an array
        let mut rows: Vec<Sale> = response.json().await.map_err(StoreError::decode)?;
        rows.pop()
            .ok_or_else(|| StoreError::Decode("Empty insert response".to_string()))
    }
}

#[async_trait(?Send)]
impl MailIngestion for SupabaseClient {
    async fn check_email(&self) -> Result<CheckEmailResponse, StoreError> {
        log::info!("POST {}", self.ingestion_url);

        let request = self
            .authorize(gloo_net::http::Request::post(&self.ingestion_url))
            .json(&serde_json::json!({}))
            .map_err(StoreError::decode)?;

        let response = request.send().await.map_err(StoreError::network)?;
        let response = Self::check_status(response).await?;

        response.json().await.map_err(StoreError::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::refresh::testing::sale;
    use crate::shared::supabase::memory::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    fn store_with(count: i64) -> MemoryStore {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for i in 0..count {
            store.push_sale(&sale("Pixup", &format!("Model {}", i), 1.0, start + Duration::minutes(i)));
        }
        store
    }

    #[tokio::test]
    async fn test_fetch_all_walks_capped_responses() {
        let store = store_with(2500);
        store.cap_rows(300);
        let query = StoreQuery::table(Collection::Sales).limit(10);

        let sales = fetch_all::<Sale, _>(&store, &query).await.unwrap();
        assert_eq!(sales.len(), 2500);
        let ids: HashSet<_> = sales.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 2500);
        // 2500 rows at 300 per response
        assert_eq!(store.reads.get(), 9);
    }

    #[tokio::test]
    async fn test_fetch_all_on_empty_set_reads_once() {
        let store = store_with(0);
        let sales = fetch_all::<Sale, _>(&store, &StoreQuery::table(Collection::Sales))
            .await
            .unwrap();
        assert!(sales.is_empty());
        assert_eq!(store.reads.get(), 1);
    }
}

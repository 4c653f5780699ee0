//! In-memory store for tests
//!
//! Applies [`StoreQuery::evaluate`] over JSON rows that already carry the
//! embedded `platforms` relation, so filters behave like the real server.

use super::client::{MailIngestion, SalesStore};
use super::error::StoreError;
use async_trait::async_trait;
use contracts::domain::a001_platform::Platform;
use contracts::domain::a002_sale::{NewSale, Sale, SaleId};
use contracts::shared::store_query::{Collection, QueryResult, StoreQuery};
use contracts::usecases::u501_check_email::CheckEmailResponse;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

type Hook = Box<dyn Fn(&StoreQuery)>;

#[derive(Default)]
pub struct MemoryStore {
    rows: RefCell<HashMap<&'static str, Vec<Value>>>,
    platforms: RefCell<Vec<Platform>>,
    failing: RefCell<HashSet<&'static str>>,
    hook: RefCell<Option<Hook>>,
    max_rows: Cell<Option<usize>>,
    pub reads: Cell<usize>,
    pub new_sales: Cell<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platforms(platforms: Vec<Platform>) -> Self {
        let store = Self::new();
        let rows = platforms
            .iter()
            .map(|p| serde_json::to_value(p).expect("platform to json"))
            .collect();
        store
            .rows
            .borrow_mut()
            .insert(Collection::Platforms.name(), rows);
        *store.platforms.borrow_mut() = platforms;
        store
    }

    pub fn push_sale(&self, sale: &Sale) {
        let row = serde_json::to_value(sale).expect("sale to json");
        self.rows
            .borrow_mut()
            .entry(Collection::Sales.name())
            .or_default()
            .push(row);
    }

    pub fn set_rows(&self, collection: Collection, rows: Vec<Value>) {
        self.rows.borrow_mut().insert(collection.name(), rows);
    }

    /// Every read of `collection` fails with HTTP 500
    pub fn fail(&self, collection: Collection) {
        self.failing.borrow_mut().insert(collection.name());
    }

    pub fn fail_ingestion(&self) {
        self.failing.borrow_mut().insert("gmail-checker");
    }

    /// Truncate every response like the server's `max-rows`; totals stay exact
    pub fn cap_rows(&self, max_rows: usize) {
        self.max_rows.set(Some(max_rows));
    }

    /// Called on every read, before the rows are evaluated
    pub fn on_select(&self, hook: impl Fn(&StoreQuery) + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }
}

#[async_trait(?Send)]
impl SalesStore for MemoryStore {
    async fn select(&self, query: &StoreQuery) -> Result<QueryResult<Value>, StoreError> {
        self.reads.set(self.reads.get() + 1);
        if let Some(hook) = self.hook.borrow().as_ref() {
            hook(query);
        }
        let name = query.collection.name();
        if self.failing.borrow().contains(name) {
            return Err(StoreError::Http {
                status: 500,
                message: format!("{} unavailable", name),
            });
        }
        let rows = self.rows.borrow().get(name).cloned().unwrap_or_default();
        let mut result = query.evaluate(&rows);
        if let Some(max) = self.max_rows.get() {
            result.rows.truncate(max);
        }
        Ok(result)
    }

    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, StoreError> {
        if self.failing.borrow().contains(Collection::Sales.name()) {
            return Err(StoreError::Http {
                status: 500,
                message: "sales unavailable".to_string(),
            });
        }
        let platform = self
            .platforms
            .borrow()
            .iter()
            .find(|p| p.id == sale.platform_id)
            .map(|p| json!({ "name": p.name }));
        let row = json!({
            "id": SaleId::new_v4(),
            "platform_id": sale.platform_id,
            "product_name": sale.product_name,
            "amount": sale.amount,
            "currency": sale.currency.code(),
            "sale_date": sale.sale_date,
            "platforms": platform,
        });
        let stored: Sale = serde_json::from_value(row.clone()).map_err(StoreError::decode)?;
        self.rows
            .borrow_mut()
            .entry(Collection::Sales.name())
            .or_default()
            .push(row);
        Ok(stored)
    }
}

#[async_trait(?Send)]
impl MailIngestion for MemoryStore {
    async fn check_email(&self) -> Result<CheckEmailResponse, StoreError> {
        if self.failing.borrow().contains("gmail-checker") {
            return Err(StoreError::Network("offline".to_string()));
        }
        Ok(CheckEmailResponse {
            new_sales: self.new_sales.get(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::supabase::fetch;
    use chrono::{TimeZone, Utc};
    use contracts::domain::a001_platform::PlatformId;
    use contracts::domain::a002_sale::Currency;

    fn platform(name: &str) -> Platform {
        Platform {
            id: PlatformId::new_v4(),
            name: name.to_string(),
            active: true,
        }
    }

    #[tokio::test]
    async fn test_insert_returns_row_with_platform() {
        let pixup = platform("Pixup");
        let store = MemoryStore::with_platforms(vec![platform("Cults3D"), pixup.clone()]);
        let sale = NewSale {
            platform_id: pixup.id,
            product_name: "Benchy".to_string(),
            amount: 5.0,
            currency: Currency::Eur,
            sale_date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
        };

        let stored = store.insert_sale(&sale).await.unwrap();
        assert_eq!(stored.platform_name(), "Pixup");
        assert_eq!(stored.currency, "EUR");

        let query = StoreQuery::table(Collection::Sales).eq("platforms.name", "Pixup");
        let rows = fetch::<Sale, _>(&store, &query).await.unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_failing_collection() {
        let store = MemoryStore::new();
        store.fail(Collection::Sales);
        let err = store
            .select(&StoreQuery::table(Collection::Sales))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Http { status: 500, .. }));
        assert!(store
            .select(&StoreQuery::table(Collection::Platforms))
            .await
            .is_ok());
    }
}

//! In-memory record store, used for tests and for fixture-backed demo runs.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::models::{BusinessProfile, BusinessSettings, InvoiceRecord, ReviewRecord, UserAccount};
use crate::database::store::{fetch_order, BusinessStore, PublicRecord, StoreError, TokenStore};

pub struct MemoryCollection<T> {
    name: String,
    records: RwLock<Vec<T>>,
    fail_exact: AtomicBool,
    fail_list: AtomicBool,
    exact_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl<T> MemoryCollection<T>
where
    T: PublicRecord + Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_records(name, Vec::new())
    }

    pub fn with_records(name: impl Into<String>, records: Vec<T>) -> Self {
        Self {
            name: name.into(),
            records: RwLock::new(records),
            fail_exact: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            exact_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub async fn insert(&self, record: T) {
        self.records.write().await.push(record);
    }

    /// Make every following exact lookup fail
    pub fn fail_exact_lookups(&self, fail: bool) {
        self.fail_exact.store(fail, Ordering::SeqCst);
    }

    /// Make every following full listing fail
    pub fn fail_list_lookups(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn exact_calls(&self) -> usize {
        self.exact_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn unavailable(&self, op: &str) -> StoreError {
        StoreError::Unavailable(format!("{} on {} failed (injected)", op, self.name))
    }
}

#[async_trait]
impl<T> TokenStore for MemoryCollection<T>
where
    T: PublicRecord + Clone + Send + Sync + 'static,
{
    type Record = T;

    fn collection(&self) -> &str {
        &self.name
    }

    async fn find_by_token(&self, token: &str) -> Result<Vec<T>, StoreError> {
        self.exact_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exact.load(Ordering::SeqCst) {
            return Err(self.unavailable("exact lookup"));
        }
        let records = self.records.read().await;
        let mut found: Vec<T> = records
            .iter()
            .filter(|r| !r.is_trashed() && r.public_token() == Some(token))
            .cloned()
            .collect();
        found.sort_by(fetch_order);
        Ok(found)
    }

    async fn list_all(&self) -> Result<Vec<T>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(self.unavailable("listing"));
        }
        let records = self.records.read().await;
        let mut visible: Vec<T> = records.iter().filter(|r| !r.is_trashed()).cloned().collect();
        visible.sort_by(fetch_order);
        Ok(visible)
    }
}

#[derive(Default)]
pub struct MemoryBusinessStore {
    settings: RwLock<Vec<BusinessSettings>>,
    users: RwLock<Vec<UserAccount>>,
    fail: AtomicBool,
}

impl MemoryBusinessStore {
    pub fn new(settings: Vec<BusinessSettings>, users: Vec<UserAccount>) -> Self {
        Self {
            settings: RwLock::new(settings),
            users: RwLock::new(users),
            fail: AtomicBool::new(false),
        }
    }

    pub async fn insert_settings(&self, settings: BusinessSettings) {
        self.settings.write().await.push(settings);
    }

    pub async fn insert_user(&self, user: UserAccount) {
        self.users.write().await.push(user);
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("business lookup failed (injected)".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BusinessStore for MemoryBusinessStore {
    async fn settings_for(&self, owner: &str) -> Result<Option<BusinessProfile>, StoreError> {
        self.check()?;
        let settings = self.settings.read().await;
        Ok(settings
            .iter()
            .find(|s| s.owner_email.eq_ignore_ascii_case(owner))
            .map(|s| s.profile.clone()))
    }

    async fn account_for(&self, owner: &str) -> Result<Option<BusinessProfile>, StoreError> {
        self.check()?;
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(owner))
            .map(BusinessProfile::from))
    }
}

/// Handles to every in-memory collection, shared with the app state
#[derive(Clone)]
pub struct MemoryStores {
    pub invoices: Arc<MemoryCollection<InvoiceRecord>>,
    pub reviews: Arc<MemoryCollection<ReviewRecord>>,
    pub business: Arc<MemoryBusinessStore>,
}

impl Default for MemoryStores {
    fn default() -> Self {
        Fixture::default().into_stores()
    }
}

/// JSON seed file for the memory backend
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub invoices: Vec<InvoiceRecord>,
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
    #[serde(default)]
    pub business_settings: Vec<BusinessSettings>,
    #[serde(default)]
    pub users: Vec<UserAccount>,
}

impl Fixture {
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid fixture {}", path.display()))
    }

    pub fn into_stores(self) -> MemoryStores {
        MemoryStores {
            invoices: Arc::new(MemoryCollection::with_records("invoices", self.invoices)),
            reviews: Arc::new(MemoryCollection::with_records("reviews", self.reviews)),
            business: Arc::new(MemoryBusinessStore::new(self.business_settings, self.users)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::InvoiceStatus;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn exact_lookup_hides_trashed_records() {
        let store = MemoryCollection::with_records(
            "invoices",
            vec![
                InvoiceRecord::new("INV-1", Some("tok-a")).trashed(),
                InvoiceRecord::new("INV-2", Some("tok-a")),
                InvoiceRecord::new("INV-3", Some("tok-b")),
            ],
        );

        let found = store.find_by_token("tok-a").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].invoice_number, "INV-2");
        assert_eq!(store.list_all().await.unwrap().len(), 2);
        assert_eq!(store.exact_calls(), 1);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn reads_follow_creation_order_with_undated_last() {
        let now = Utc::now();
        let mut undated = InvoiceRecord::new("UNDATED", Some("tok"));
        undated.created_at = None;
        let store = MemoryCollection::with_records(
            "invoices",
            vec![
                undated,
                InvoiceRecord::new("NEW", Some("tok")).with_created_at(now),
                InvoiceRecord::new("OLD", Some("tok")).with_created_at(now - Duration::days(1)),
            ],
        );

        let numbers = |records: Vec<InvoiceRecord>| records.into_iter().map(|r| r.invoice_number).collect::<Vec<_>>();
        assert_eq!(numbers(store.list_all().await.unwrap()), vec!["OLD", "NEW", "UNDATED"]);
        assert_eq!(numbers(store.find_by_token("tok").await.unwrap()), vec!["OLD", "NEW", "UNDATED"]);
    }

    #[test]
    fn equal_timestamps_fall_back_to_id() {
        let at = Utc::now();
        let a = InvoiceRecord::new("A", None).with_created_at(at);
        let b = InvoiceRecord::new("B", None).with_created_at(at);
        assert_eq!(fetch_order(&a, &b), a.id.cmp(&b.id));
    }

    #[tokio::test]
    async fn injected_failures_surface_as_unavailable() {
        let store: MemoryCollection<InvoiceRecord> = MemoryCollection::new("invoices");
        store.fail_list_lookups(true);
        assert!(matches!(store.list_all().await, Err(StoreError::Unavailable(_))));
        assert!(store.find_by_token("x").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn demo_fixture_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/demo.json");
        let stores = Fixture::from_path(path).unwrap().into_stores();

        let invoices = stores.invoices.list_all().await.unwrap();
        assert!(!invoices.is_empty());
        assert!(invoices.iter().any(|i| i.status == InvoiceStatus::Cancelled));
        assert!(!stores.reviews.list_all().await.unwrap().is_empty());
        assert!(stores.business.settings_for("studio@acme.test").await.unwrap().is_some());
    }

    #[test]
    fn missing_fixture_is_an_error() {
        assert!(Fixture::from_path("/nonexistent/fixture.json").is_err());
    }
}

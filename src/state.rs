use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, ResolverConfig, StoreBackend};
use crate::database::models::{InvoiceRecord, ReviewRecord};
use crate::database::{
    BusinessStore, DatabaseManager, Fixture, MemoryStores, PgBusinessStore, PgCollection, StoreError, TokenStore,
};

#[derive(Clone)]
pub enum Backend {
    Memory,
    Postgres(PgPool),
}

/// Shared handler state: one store per collection plus resolver settings
#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<dyn TokenStore<Record = InvoiceRecord>>,
    pub reviews: Arc<dyn TokenStore<Record = ReviewRecord>>,
    pub business: Arc<dyn BusinessStore>,
    pub resolver: ResolverConfig,
    backend: Backend,
}

impl AppState {
    pub fn memory(stores: MemoryStores, resolver: ResolverConfig) -> Self {
        Self {
            invoices: stores.invoices,
            reviews: stores.reviews,
            business: stores.business,
            resolver,
            backend: Backend::Memory,
        }
    }

    pub fn postgres(pool: PgPool, config: &AppConfig) -> Self {
        let max_limit = config.filter.max_limit;
        Self {
            invoices: Arc::new(PgCollection::<InvoiceRecord>::new("invoices", pool.clone()).with_max_limit(max_limit)),
            reviews: Arc::new(PgCollection::<ReviewRecord>::new("reviews", pool.clone()).with_max_limit(max_limit)),
            business: Arc::new(PgBusinessStore::new(pool.clone())),
            resolver: config.resolver.clone(),
            backend: Backend::Postgres(pool),
        }
    }

    /// Build the configured backend
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.store.backend {
            StoreBackend::Memory => {
                let fixture = match config.store.fixture_path.as_deref() {
                    Some(path) => {
                        info!("Seeding memory store from {}", path);
                        Fixture::from_path(path)?
                    }
                    None => Fixture::default(),
                };
                Ok(Self::memory(fixture.into_stores(), config.resolver.clone()))
            }
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to the record database")?;
                Ok(Self::postgres(pool, config))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory => "memory",
            Backend::Postgres(_) => "postgres",
        }
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Memory => Ok(()),
            Backend::Postgres(pool) => DatabaseManager::health_check(pool).await,
        }
    }
}

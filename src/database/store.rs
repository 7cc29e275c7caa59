use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::BusinessProfile;
use crate::filter::FilterError;

/// Errors from any record store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Failed to decode {collection} row: {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A record that can be opened by a public token
pub trait PublicRecord {
    fn id(&self) -> Uuid;

    fn public_token(&self) -> Option<&str>;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Terminal state that blocks public access
    fn is_cancelled(&self) -> bool;

    fn is_trashed(&self) -> bool {
        false
    }
}

/// Fetch order shared by every backend: `created_at` ascending with missing
/// timestamps last (Postgres `ASC NULLS LAST`), then `id`.
pub fn fetch_order<R: PublicRecord>(a: &R, b: &R) -> Ordering {
    let by_created = match (a.created_at(), b.created_at()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_created.then_with(|| a.id().cmp(&b.id()))
}

/// Exact-filter and full-list reads over one token-bearing collection.
///
/// Both reads return typed records in a stable order (creation time, then id)
/// so that "first match" means the same thing across backends.
#[async_trait]
pub trait TokenStore: Send + Sync {
    type Record: PublicRecord + Clone + Send + Sync + 'static;

    /// Collection name, used in logs
    fn collection(&self) -> &str;

    /// Records whose stored token equals `token` exactly
    async fn find_by_token(&self, token: &str) -> Result<Vec<Self::Record>, StoreError>;

    /// Every visible record of the collection
    async fn list_all(&self) -> Result<Vec<Self::Record>, StoreError>;
}

/// The two sources of business details for a record owner
#[async_trait]
pub trait BusinessStore: Send + Sync {
    /// Business settings saved by the owner
    async fn settings_for(&self, owner: &str) -> Result<Option<BusinessProfile>, StoreError>;

    /// Details from the owner's user account
    async fn account_for(&self, owner: &str) -> Result<Option<BusinessProfile>, StoreError>;
}

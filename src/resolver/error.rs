use thiserror::Error;

use crate::database::StoreError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Token is required")]
    EmptyToken,

    /// The primary exact lookup failed; never downgraded to not-found
    #[error("Exact token lookup failed: {0}")]
    Lookup(#[source] StoreError),

    #[error("Token matches {matches} records")]
    Ambiguous { matches: usize },
}

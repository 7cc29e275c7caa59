use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{AmbiguityPolicy, ResolverConfig};
use crate::database::{PublicRecord, TokenStore};

use super::error::ResolveError;
use super::token::{is_fallback_eligible, LegacyMatcher, MatchRule};

/// A record found for a token, with the rule that matched it
#[derive(Debug, Clone)]
pub struct Resolved<R> {
    pub record: R,
    pub matched_by: MatchRule,
}

/// Operator-facing counts explaining a miss. Never carries record data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionDiagnostics {
    pub token_length: usize,
    pub fallback_eligible: bool,
    pub fallback_attempted: bool,
    pub fallback_failed: bool,
    pub scanned: usize,
}

#[derive(Debug, Clone)]
pub enum Resolution<R> {
    Found(Resolved<R>),
    NotFound(ResolutionDiagnostics),
}

impl<R> Resolution<R> {
    pub fn found(self) -> Option<Resolved<R>> {
        match self {
            Resolution::Found(resolved) => Some(resolved),
            Resolution::NotFound(_) => None,
        }
    }
}

/// Resolves a public token against one collection: exact lookup first, then
/// the legacy fallback scan for hyphenated tokens.
///
/// The resolver does not enforce the status gate; callers check
/// `PublicRecord::is_cancelled` on the returned record.
pub struct TokenResolver<'a, S: ?Sized> {
    store: &'a S,
    config: ResolverConfig,
}

impl<'a, S> TokenResolver<'a, S>
where
    S: TokenStore + ?Sized,
{
    pub fn new(store: &'a S, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    pub async fn resolve(&self, requested: &str) -> Result<Resolution<S::Record>, ResolveError> {
        let token = requested.trim();
        if token.is_empty() {
            return Err(ResolveError::EmptyToken);
        }

        let collection = self.store.collection();
        let exact = self.store.find_by_token(token).await.map_err(ResolveError::Lookup)?;
        if let Some(record) = exact.into_iter().next() {
            debug!(collection, "token resolved by exact match");
            return Ok(Resolution::Found(Resolved { record, matched_by: MatchRule::Exact }));
        }

        let mut diagnostics = ResolutionDiagnostics {
            token_length: token.len(),
            fallback_eligible: is_fallback_eligible(token),
            ..Default::default()
        };

        if !diagnostics.fallback_eligible || !self.config.fallback_enabled {
            debug!(collection, eligible = diagnostics.fallback_eligible, "no exact match; fallback skipped");
            return Ok(Resolution::NotFound(diagnostics));
        }

        diagnostics.fallback_attempted = true;
        let candidates = match self.store.list_all().await {
            Ok(records) => records,
            Err(e) => {
                // Degrade to not-found; the exact path already had its say
                warn!(collection, error = %e, "fallback listing failed; reporting not found");
                diagnostics.fallback_failed = true;
                return Ok(Resolution::NotFound(diagnostics));
            }
        };
        diagnostics.scanned = candidates.len();

        let matcher = LegacyMatcher::new(token);
        let matches: Vec<Resolved<S::Record>> = candidates
            .into_iter()
            .filter_map(|record| {
                let stored = record.public_token().unwrap_or_default();
                matcher.matches(stored).map(|matched_by| Resolved { record, matched_by })
            })
            .collect();

        let match_count = matches.len();
        match self.choose(matches)? {
            Some(resolved) => {
                info!(
                    collection,
                    rule = ?resolved.matched_by,
                    matches = match_count,
                    scanned = diagnostics.scanned,
                    "legacy token resolved by fallback scan"
                );
                Ok(Resolution::Found(resolved))
            }
            None => {
                debug!(collection, scanned = diagnostics.scanned, "fallback scan found no match");
                Ok(Resolution::NotFound(diagnostics))
            }
        }
    }

    fn choose(&self, matches: Vec<Resolved<S::Record>>) -> Result<Option<Resolved<S::Record>>, ResolveError> {
        match self.config.ambiguity {
            AmbiguityPolicy::First => Ok(matches.into_iter().next()),
            AmbiguityPolicy::Reject if matches.len() > 1 => {
                Err(ResolveError::Ambiguous { matches: matches.len() })
            }
            AmbiguityPolicy::Reject => Ok(matches.into_iter().next()),
            AmbiguityPolicy::Newest => {
                // Strictly newer wins, so ties and missing timestamps keep fetch order
                let mut best: Option<Resolved<S::Record>> = None;
                for candidate in matches {
                    let newer = match &best {
                        None => true,
                        Some(current) => candidate.record.created_at() > current.record.created_at(),
                    };
                    if newer {
                        best = Some(candidate);
                    }
                }
                Ok(best)
            }
        }
    }
}

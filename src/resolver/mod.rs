pub mod error;
pub mod resolver;
pub mod token;

pub use error::ResolveError;
pub use resolver::{Resolution, ResolutionDiagnostics, Resolved, TokenResolver};
pub use token::{is_fallback_eligible, legacy_match, uuid_part, LegacyMatcher, MatchRule};

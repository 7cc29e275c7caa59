use clap::Args;
use serde::Serialize;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{CommandStatus, OutputFormat};
use crate::resolver::{is_fallback_eligible, LegacyMatcher, MatchRule};

#[derive(Args)]
pub struct InspectArgs {
    #[arg(help = "Token as presented by the client")]
    pub token: String,

    #[arg(long = "stored", help = "Stored token to compare against (repeatable)")]
    pub stored: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StoredComparison {
    pub stored: String,
    pub matched_by: Option<MatchRule>,
}

#[derive(Debug, Serialize)]
pub struct TokenReport {
    pub token: String,
    pub length: usize,
    pub uuid_part: String,
    pub fallback_eligible: bool,
    pub comparisons: Vec<StoredComparison>,
}

/// Mirror the resolver's decision for each stored token: exact first, then
/// the legacy predicate when the token is eligible for the fallback scan.
pub fn inspect(token: &str, stored: &[String]) -> TokenReport {
    let matcher = LegacyMatcher::new(token);
    let eligible = is_fallback_eligible(token);

    let comparisons = stored
        .iter()
        .map(|s| {
            let matched_by = if s == token {
                Some(MatchRule::Exact)
            } else if eligible {
                matcher.matches(s)
            } else {
                None
            };
            StoredComparison { stored: s.clone(), matched_by }
        })
        .collect();

    TokenReport {
        token: token.to_string(),
        length: token.len(),
        uuid_part: matcher.uuid_part().to_string(),
        fallback_eligible: eligible,
        comparisons,
    }
}

pub fn handle(args: InspectArgs, output_format: OutputFormat) -> anyhow::Result<CommandStatus> {
    let report = inspect(args.token.trim(), &args.stored);

    match output_format {
        OutputFormat::Json => output_success(&output_format, "Token inspected", Some(json!(report)))?,
        OutputFormat::Text => {
            println!("token:             {} ({} chars)", report.token, report.length);
            println!("uuid part:         {}", report.uuid_part);
            println!("fallback eligible: {}", report.fallback_eligible);
            for c in &report.comparisons {
                match c.matched_by {
                    Some(rule) => println!("  {:<45} matches ({:?})", c.stored, rule),
                    None => println!("  {:<45} no match", c.stored),
                }
            }
        }
    }
    Ok(CommandStatus::Success)
}

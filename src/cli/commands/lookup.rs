use anyhow::Context;
use clap::{Args, ValueEnum};
use reqwest::StatusCode;
use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::{CommandStatus, OutputFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LookupKind {
    Invoice,
    Review,
}

impl LookupKind {
    fn collection(self) -> &'static str {
        match self {
            LookupKind::Invoice => "invoices",
            LookupKind::Review => "reviews",
        }
    }
}

#[derive(Args)]
pub struct LookupArgs {
    #[arg(help = "Public token to resolve")]
    pub token: String,

    #[arg(long, value_enum, default_value = "invoice", help = "Record kind to look up")]
    pub kind: LookupKind,

    #[arg(long, env = "INVOICE_LINK_SERVER", default_value = "http://localhost:3000", help = "API base URL")]
    pub server: String,
}

/// `{server}/public/{collection}/{token}`, with the token percent-encoded
pub fn lookup_url(server: &str, kind: LookupKind, token: &str) -> anyhow::Result<url::Url> {
    let mut url = url::Url::parse(server).with_context(|| format!("invalid server URL: {}", server))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("server URL cannot be a base: {}", server))?
        .pop_if_empty()
        .extend(["public", kind.collection(), token]);
    Ok(url)
}

pub async fn handle(args: LookupArgs, output_format: OutputFormat) -> anyhow::Result<CommandStatus> {
    let url = lookup_url(&args.server, args.kind, args.token.trim())?;
    tracing::debug!("GET {}", url);

    let res = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {} failed", args.server))?;
    let status = res.status();
    let body: Value = res.json().await.context("server returned a non-JSON body")?;

    report(status, &body, output_format)
}

/// Print the server's answer once; a rejected lookup is a failed status, not an error
pub fn report(status: StatusCode, body: &Value, output_format: OutputFormat) -> anyhow::Result<CommandStatus> {
    if status.is_success() {
        let data = body.get("data").cloned().unwrap_or(Value::Null);
        match output_format {
            OutputFormat::Json => output_success(&output_format, "Token resolved", Some(serde_json::json!({ "data": data })))?,
            OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&data)?),
        }
        Ok(CommandStatus::Success)
    } else {
        let message = body.get("message").and_then(Value::as_str).unwrap_or("lookup failed");
        let code = body.get("code").and_then(Value::as_str);
        output_error(&output_format, &format!("{} ({})", message, status), code)?;
        Ok(CommandStatus::Failed)
    }
}

mod common;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use invoice_link_api::config::{AmbiguityPolicy, ResolverConfig};
use invoice_link_api::database::models::{BusinessProfile, BusinessSettings, InvoiceRecord, InvoiceStatus};
use invoice_link_api::database::MemoryStores;

const CURRENT: &str = "5f0c2d8e-3b1a-4c6f-9e2d-7a8b9c0d1e2f";
const LEGACY_STORED: &str = "9a4e7c21-6d3b-4f80";
const LEGACY_REQUESTED: &str = "9a4e7c21-6d3b-4f80-b1c2-d3e4f5a6b7c8";
const CANCELLED: &str = "c3d4e5f6-a7b8-4c9d-8e0f-1a2b3c4d5e6f";

async fn seeded() -> MemoryStores {
    let stores = MemoryStores::default();
    stores
        .invoices
        .insert(
            InvoiceRecord::new("INV-1001", Some(CURRENT))
                .with_owner(common::OWNER)
                .with_pdf_url("https://files.example.com/INV-1001.pdf"),
        )
        .await;
    stores
        .invoices
        .insert(InvoiceRecord::new("INV-0987", Some(LEGACY_STORED)).with_owner(common::OWNER))
        .await;
    stores
        .invoices
        .insert(InvoiceRecord::new("INV-0950", Some(CANCELLED)).with_status(InvoiceStatus::Cancelled))
        .await;
    stores
        .business
        .insert_settings(BusinessSettings {
            owner_email: common::OWNER.to_string(),
            profile: BusinessProfile {
                business_name: Some("Acme Studio".into()),
                ..Default::default()
            },
        })
        .await;
    stores
}

#[tokio::test]
async fn get_by_current_token() -> Result<()> {
    let server = common::spawn_default(seeded().await).await?;

    let res = reqwest::get(server.url(&format!("/public/invoices/{}", CURRENT))).await?;
    assert_eq!(res.status(), StatusCode::OK, "expected 200 OK, got {}", res.status());

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["invoice"]["invoice_number"], "INV-1001");
    assert_eq!(body["data"]["invoice"]["status"], "sent");
    assert_eq!(body["data"]["matched_by"], "exact");
    assert_eq!(body["data"]["business"]["business_name"], "Acme Studio");
    assert_eq!(server.stores.invoices.list_calls(), 0, "exact hit must not scan");

    Ok(())
}

#[tokio::test]
async fn post_lookup_resolves_legacy_truncated_token() -> Result<()> {
    let server = common::spawn_default(seeded().await).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/public/invoices/lookup"))
        .json(&json!({ "token": LEGACY_REQUESTED }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "expected 200 OK, got {}", res.status());

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["invoice"]["invoice_number"], "INV-0987");
    assert_eq!(body["data"]["matched_by"], "stored_prefix");

    Ok(())
}

#[tokio::test]
async fn post_lookup_rejects_non_string_token() -> Result<()> {
    let server = common::spawn_default(seeded().await).await?;
    let client = reqwest::Client::new();

    for payload in [json!({ "token": 12345 }), json!({}), json!({ "token": ["a"] })] {
        let res = client.post(server.url("/public/invoices/lookup")).json(&payload).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {} should be rejected", payload);
        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    let res = client
        .post(server.url("/public/invoices/lookup"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(server.stores.invoices.exact_calls(), 0, "store must not be called for invalid bodies");

    Ok(())
}

#[tokio::test]
async fn cancelled_invoice_is_forbidden() -> Result<()> {
    let server = common::spawn_default(seeded().await).await?;

    let res = reqwest::get(server.url(&format!("/public/invoices/{}", CANCELLED))).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none(), "cancelled payload leaked: {}", body);

    Ok(())
}

#[tokio::test]
async fn miss_returns_404_with_counts() -> Result<()> {
    let server = common::spawn_default(seeded().await).await?;

    let res = reqwest::get(server.url("/public/invoices/ffffffff-0000-4000-8000-000000000000")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["context"]["fallback_attempted"], true);
    assert_eq!(body["context"]["scanned"], 3);
    assert!(!body.to_string().contains("INV-"), "miss must not leak records: {}", body);

    Ok(())
}

#[tokio::test]
async fn hyphenless_miss_skips_fallback() -> Result<()> {
    let server = common::spawn_default(seeded().await).await?;

    let res = reqwest::get(server.url("/public/invoices/notATokenAtAll")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.stores.invoices.list_calls(), 0);

    Ok(())
}

#[tokio::test]
async fn fallback_listing_failure_degrades_to_404() -> Result<()> {
    let stores = seeded().await;
    stores.invoices.fail_list_lookups(true);
    let server = common::spawn_default(stores).await?;

    let res = reqwest::get(server.url(&format!("/public/invoices/{}", LEGACY_REQUESTED))).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["context"]["fallback_failed"], true);

    Ok(())
}

#[tokio::test]
async fn exact_lookup_failure_is_500() -> Result<()> {
    let stores = seeded().await;
    stores.invoices.fail_exact_lookups(true);
    let server = common::spawn_default(stores).await?;

    let res = reqwest::get(server.url(&format!("/public/invoices/{}", CURRENT))).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(server.stores.invoices.list_calls(), 0);

    Ok(())
}

async fn ambiguous_stores() -> MemoryStores {
    let older = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let newer = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let stores = MemoryStores::default();
    stores
        .invoices
        .insert(InvoiceRecord::new("OLD", Some("aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee")).with_created_at(older))
        .await;
    stores
        .invoices
        .insert(InvoiceRecord::new("NEW", Some("aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee-99")).with_created_at(newer))
        .await;
    stores
}

#[tokio::test]
async fn ambiguous_fallback_follows_policy() -> Result<()> {
    let requested = "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee-1700000000";

    let server = common::spawn_default(ambiguous_stores().await).await?;
    let body = reqwest::get(server.url(&format!("/public/invoices/{}", requested))).await?.json::<Value>().await?;
    assert_eq!(body["data"]["invoice"]["invoice_number"], "NEW");

    let first = ResolverConfig { ambiguity: AmbiguityPolicy::First, ..ResolverConfig::default() };
    let server = common::spawn_server(ambiguous_stores().await, first).await?;
    let body = reqwest::get(server.url(&format!("/public/invoices/{}", requested))).await?.json::<Value>().await?;
    assert_eq!(body["data"]["invoice"]["invoice_number"], "OLD");

    let reject = ResolverConfig { ambiguity: AmbiguityPolicy::Reject, ..ResolverConfig::default() };
    let server = common::spawn_server(ambiguous_stores().await, reject).await?;
    let res = reqwest::get(server.url(&format!("/public/invoices/{}", requested))).await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn token_spelled_lookup_opens_by_get() -> Result<()> {
    let stores = seeded().await;
    stores.invoices.insert(InvoiceRecord::new("INV-LOOKUP", Some("lookup"))).await;
    let server = common::spawn_default(stores).await?;

    let res = reqwest::get(server.url("/public/invoices/lookup")).await?;
    assert_eq!(res.status(), StatusCode::OK, "expected 200 OK, got {}", res.status());
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["invoice"]["invoice_number"], "INV-LOOKUP");

    let res = reqwest::Client::new()
        .post(server.url("/public/invoices/lookup"))
        .json(&json!({ "token": CURRENT }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "POST lookup must still work");

    Ok(())
}

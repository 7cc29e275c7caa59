use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::database::models::{BusinessProfile, InvoiceStatus, ReviewStatus};
use crate::database::{PublicRecord, TokenStore};
use crate::error::ApiError;
use crate::resolver::{MatchRule, Resolution, Resolved, TokenResolver};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceProjection {
    pub invoice_number: String,
    pub pdf_url: Option<String>,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicInvoiceView {
    pub invoice: InvoiceProjection,
    pub business: BusinessProfile,
    pub matched_by: MatchRule,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewProjection {
    pub title: String,
    pub document_url: Option<String>,
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicReviewView {
    pub review: ReviewProjection,
    pub business: BusinessProfile,
    pub matched_by: MatchRule,
}

/// Unauthenticated views of invoices and review requests, opened by token
pub struct PublicLookupService<'a> {
    state: &'a AppState,
}

impl<'a> PublicLookupService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn invoice(&self, token: &str) -> Result<PublicInvoiceView, ApiError> {
        let Resolved { record, matched_by } = self.resolve_open(self.state.invoices.as_ref(), "Invoice", token).await?;
        let business = self.business_info(record.created_by.as_deref()).await?;

        Ok(PublicInvoiceView {
            invoice: InvoiceProjection {
                invoice_number: record.invoice_number,
                pdf_url: record.pdf_url,
                status: record.status,
            },
            business,
            matched_by,
        })
    }

    pub async fn review(&self, token: &str) -> Result<PublicReviewView, ApiError> {
        let Resolved { record, matched_by } = self.resolve_open(self.state.reviews.as_ref(), "Review", token).await?;
        let business = self.business_info(record.created_by.as_deref()).await?;

        Ok(PublicReviewView {
            review: ReviewProjection {
                title: record.title,
                document_url: record.document_url,
                status: record.status,
            },
            business,
            matched_by,
        })
    }

    /// Resolve and apply the status gate
    async fn resolve_open<R>(
        &self,
        store: &dyn TokenStore<Record = R>,
        kind: &str,
        token: &str,
    ) -> Result<Resolved<R>, ApiError>
    where
        R: PublicRecord + Clone + Send + Sync + 'static,
    {
        let resolver = TokenResolver::new(store, self.state.resolver.clone());
        match resolver.resolve(token).await? {
            Resolution::Found(resolved) if resolved.record.is_cancelled() => {
                info!(collection = store.collection(), "public access to cancelled record refused");
                Err(ApiError::forbidden(format!("{} has been cancelled", kind)))
            }
            Resolution::Found(resolved) => Ok(resolved),
            Resolution::NotFound(diagnostics) => Err(ApiError::not_found_with_context(
                format!("{} not found", kind),
                json!(diagnostics),
            )),
        }
    }

    /// Settings first, account second, field by field
    async fn business_info(&self, owner: Option<&str>) -> Result<BusinessProfile, ApiError> {
        let Some(owner) = owner.map(str::trim).filter(|o| !o.is_empty()) else {
            return Ok(BusinessProfile::default());
        };

        let settings = self.state.business.settings_for(owner).await?;
        let account = self.state.business.account_for(owner).await?;
        Ok(BusinessProfile::merged(settings.as_ref(), account.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::database::models::{BusinessSettings, InvoiceRecord, ReviewRecord, UserAccount};
    use crate::database::MemoryStores;

    const OWNER: &str = "studio@acme.test";

    async fn seeded() -> (MemoryStores, AppState) {
        let stores = MemoryStores::default();
        stores
            .invoices
            .insert(
                InvoiceRecord::new("INV-0001", Some("k3v9QmZp2xTn8RwLc4Yb"))
                    .with_owner(OWNER)
                    .with_pdf_url("https://files.example.com/inv-0001.pdf"),
            )
            .await;
        stores
            .invoices
            .insert(InvoiceRecord::new("INV-0002", Some("abc12345-fu")).with_status(InvoiceStatus::Cancelled))
            .await;
        stores
            .reviews
            .insert(ReviewRecord::new("Brand guidelines v2", Some("rv-7Qp2")).with_owner(OWNER))
            .await;
        stores
            .business
            .insert_settings(BusinessSettings {
                owner_email: OWNER.to_string(),
                profile: BusinessProfile {
                    business_name: Some("Acme Studio".into()),
                    footer_text: Some("Payment due in 30 days".into()),
                    ..Default::default()
                },
            })
            .await;
        stores
            .business
            .insert_user(UserAccount {
                email: OWNER.to_string(),
                full_name: Some("Jane Doe".into()),
                company_name: None,
                company_logo_url: Some("https://cdn.example.com/acme.png".into()),
                address: None,
                phone: Some("555-0100".into()),
            })
            .await;

        let state = AppState::memory(stores.clone(), ResolverConfig::default());
        (stores, state)
    }

    #[tokio::test]
    async fn invoice_view_merges_business_sources() {
        let (_, state) = seeded().await;
        let view = PublicLookupService::new(&state).invoice("k3v9QmZp2xTn8RwLc4Yb").await.unwrap();

        assert_eq!(view.invoice.invoice_number, "INV-0001");
        assert_eq!(view.invoice.pdf_url.as_deref(), Some("https://files.example.com/inv-0001.pdf"));
        assert_eq!(view.matched_by, MatchRule::Exact);
        assert_eq!(view.business.business_name.as_deref(), Some("Acme Studio"));
        assert_eq!(view.business.logo_url.as_deref(), Some("https://cdn.example.com/acme.png"));
        assert_eq!(view.business.email.as_deref(), Some(OWNER));
        assert_eq!(view.business.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn cancelled_invoice_is_forbidden_not_missing() {
        let (_, state) = seeded().await;
        let err = PublicLookupService::new(&state).invoice("abc12345-full").await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn miss_reports_counts() {
        let (_, state) = seeded().await;
        let err = PublicLookupService::new(&state).invoice("zzz-unknown").await.unwrap_err();
        match err {
            ApiError::NotFound { context: Some(context), .. } => {
                assert_eq!(context["fallback_attempted"], true);
                assert_eq!(context["scanned"], 2);
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn business_lookup_failure_is_fatal() {
        let (stores, state) = seeded().await;
        stores.business.fail_lookups(true);
        let err = PublicLookupService::new(&state).review("rv-7Qp2").await.unwrap_err();
        assert!(err.status_code() >= 500);
    }

    #[tokio::test]
    async fn record_without_owner_has_empty_business() {
        let (stores, state) = seeded().await;
        stores.invoices.insert(InvoiceRecord::new("INV-0003", Some("orphanToken"))).await;
        let view = PublicLookupService::new(&state).invoice("orphanToken").await.unwrap();
        assert_eq!(view.business, BusinessProfile::default());
    }
}

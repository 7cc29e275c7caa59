// handlers/public/invoice.rs - public invoice lookups by token

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;
use serde_json::Value;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PublicInvoiceView, PublicLookupService};
use crate::state::AppState;

use super::utils::{token_from_body, LOOKUP_SEGMENT};

/// GET /public/invoices/:token
pub async fn invoice_get(State(state): State<AppState>, Path(token): Path<String>) -> ApiResult<PublicInvoiceView> {
    let view = PublicLookupService::new(&state).invoice(&token).await?;
    Ok(ApiResponse::success(view))
}

/// GET /public/invoices/lookup. The static lookup path shadows `:token`, so a
/// stored token spelled `lookup` is opened here.
pub async fn invoice_get_lookup(State(state): State<AppState>) -> ApiResult<PublicInvoiceView> {
    let view = PublicLookupService::new(&state).invoice(LOOKUP_SEGMENT).await?;
    Ok(ApiResponse::success(view))
}

/// POST /public/invoices/lookup with `{ "token": "..." }`
pub async fn invoice_lookup(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PublicInvoiceView> {
    let token = token_from_body(body)?;
    let view = PublicLookupService::new(&state).invoice(&token).await?;
    Ok(ApiResponse::success(view))
}

// handlers/public/review.rs - public document review lookups by token

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;
use serde_json::Value;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PublicLookupService, PublicReviewView};
use crate::state::AppState;

use super::utils::{token_from_body, LOOKUP_SEGMENT};

/// GET /public/reviews/:token
pub async fn review_get(State(state): State<AppState>, Path(token): Path<String>) -> ApiResult<PublicReviewView> {
    let view = PublicLookupService::new(&state).review(&token).await?;
    Ok(ApiResponse::success(view))
}

/// GET /public/reviews/lookup. The static lookup path shadows `:token`, so a
/// stored token spelled `lookup` is opened here.
pub async fn review_get_lookup(State(state): State<AppState>) -> ApiResult<PublicReviewView> {
    let view = PublicLookupService::new(&state).review(LOOKUP_SEGMENT).await?;
    Ok(ApiResponse::success(view))
}

/// POST /public/reviews/lookup with `{ "token": "..." }`
pub async fn review_lookup(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PublicReviewView> {
    let token = token_from_body(body)?;
    let view = PublicLookupService::new(&state).review(&token).await?;
    Ok(ApiResponse::success(view))
}

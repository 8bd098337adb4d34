use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use tracing::info;

use super::validation::{SearchParams, validate_search_request};
use super::{ApiError, AppState};
use crate::models::SearchResponse;

pub async fn search_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
) -> Result<Json<SearchResponse>, ApiError> {
    let (query, authorization) = validate_search_request(&params, &headers)?;

    info!(
        keywords = query.keywords.len(),
        hours = query.hours,
        lang = %query.lang,
        "search request"
    );

    let response = state
        .search_service()
        .execute(&query, &authorization)
        .await?;

    Ok(Json(response))
}

/// Plain OPTIONS (non-preflight) also succeeds with no body; actual CORS
/// preflights are answered by the CORS layer before reaching here.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

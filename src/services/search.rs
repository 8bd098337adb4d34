use std::sync::Arc;

use tracing::debug;

use crate::clients::upstash::{UpstashClient, cache_key};
use crate::clients::x_api::{XApiError, XSearchClient, build_search_query};
use crate::models::{CacheInfo, SearchQuery, SearchResponse, TimeWindow};
use crate::services::scoring::rank_posts;

/// Read-through search pipeline: cache lookup, upstream fetch on a miss,
/// scoring, truncation, write-back.
///
/// Concurrent identical requests may race each other to the same key; the
/// write is last-wins and idempotent modulo window jitter, so no
/// single-flight coordination exists.
pub struct SearchService {
    cache: Arc<UpstashClient>,
    x_api: Arc<XSearchClient>,
    cache_ttl_seconds: u64,
}

impl SearchService {
    #[must_use]
    pub fn new(cache: Arc<UpstashClient>, x_api: Arc<XSearchClient>, cache_ttl_seconds: u64) -> Self {
        Self {
            cache,
            x_api,
            cache_ttl_seconds,
        }
    }

    pub async fn execute(
        &self,
        query: &SearchQuery,
        authorization: &str,
    ) -> Result<SearchResponse, XApiError> {
        let key = cache_key(&query.keywords, query.hours, query.lang);

        if let Some(mut cached) = self.cache.get::<SearchResponse>(&key).await {
            debug!(%key, "serving cached result");
            cached.cache = CacheInfo {
                hit: true,
                ttl_seconds: self.cache_ttl_seconds,
            };
            return Ok(cached);
        }

        let search_query = build_search_query(&query.keywords, query.lang);
        let window = TimeWindow::last_hours(query.hours);

        let page = self
            .x_api
            .recent_search(&search_query, window, authorization)
            .await?;

        let ranked = rank_posts(page.posts, &page.users);
        let total_fetched = ranked.len();

        let response = SearchResponse {
            keywords: query.keywords.clone(),
            query: search_query,
            window,
            total_fetched,
            results: ranked.into_iter().take(query.max).collect(),
            cache: CacheInfo {
                hit: false,
                ttl_seconds: self.cache_ttl_seconds,
            },
        };

        // The truncated payload is what gets cached; repeat callers get the
        // exact body a fresh fetch would have produced.
        if !self.cache.set(&key, &response, self.cache_ttl_seconds).await && self.cache.enabled() {
            debug!(%key, "result not cached");
        }

        Ok(response)
    }
}

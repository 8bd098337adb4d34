use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the upstream query filter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Tr,
    En,
}

impl Lang {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
        }
    }

    /// Exactly `"en"` (any casing) selects English; everything else falls
    /// back to Turkish.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("en") => Self::En,
            _ => Self::Tr,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search request that already passed parameter validation.
///
/// The caller's bearer credential is deliberately not part of this value; it
/// travels alongside so it can never leak into cache keys or logs.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keywords: Vec<String>,

    pub hours: u32,

    pub lang: Lang,

    pub max: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The window ending now and reaching `hours` back.
    #[must_use]
    pub fn last_hours(hours: u32) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::hours(i64::from(hours)),
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub like: u64,
    pub repost: u64,
    pub reply: u64,
    pub quote: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: Option<String>,

    /// Empty when the author was not present in the upstream user expansion.
    pub username: String,

    pub name: String,
}

/// One ranked post as served to the caller and stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    pub id: String,
    pub text: String,
    pub created_at: Option<String>,
    pub lang: Option<String>,
    pub author: PostAuthor,
    pub metrics: EngagementMetrics,
    pub score: f64,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub hit: bool,
    pub ttl_seconds: u64,
}

/// The full response body; also the exact value stored in the cache.
/// On a cache hit only `cache` is rewritten before responding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub keywords: Vec<String>,

    /// The query string actually sent upstream.
    pub query: String,

    pub window: TimeWindow,

    /// Result count before truncation to the requested maximum.
    pub total_fetched: usize,

    pub results: Vec<ScoredPost>,

    pub cache: CacheInfo,
}

pub mod search;
pub use search::{
    CacheInfo, EngagementMetrics, Lang, PostAuthor, ScoredPost, SearchQuery, SearchResponse,
    TimeWindow,
};

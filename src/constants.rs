pub mod limits {

    /// Keyword lists longer than this are silently cut to the first entries.
    pub const MAX_KEYWORDS: usize = 60;

    pub const MIN_RESULTS: usize = 1;

    pub const MAX_RESULTS: usize = 50;

    pub const DEFAULT_RESULTS: usize = 10;
}

pub mod cache {

    pub const KEY_NAMESPACE: &str = "trendarr";

    /// Bumped whenever the cached payload shape changes, so stale entries miss.
    pub const KEY_VERSION: &str = "v1";

    pub const DEFAULT_TTL_SECONDS: u64 = 600;
}

pub mod window {

    /// Accepted values for the `hours` query parameter.
    pub const ALLOWED_HOURS: &[u32] = &[1, 3, 6, 12, 24];
}

use std::sync::Arc;

use crate::clients::upstash::UpstashClient;
use crate::clients::x_api::XSearchClient;
use crate::config::Config;
use crate::services::SearchService;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Both outbound clients reuse it to enable connection pooling and avoid
/// socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Trendarr/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub cache: Arc<UpstashClient>,

    pub x_api: Arc<XSearchClient>,

    pub search_service: Arc<SearchService>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client =
            build_shared_http_client(config.x_api.request_timeout_seconds.into())?;

        let cache = Arc::new(UpstashClient::new(&config.cache, http_client.clone()));
        let x_api = Arc::new(XSearchClient::new(&config.x_api, http_client));

        let search_service = Arc::new(SearchService::new(
            cache.clone(),
            x_api.clone(),
            config.cache.ttl_seconds,
        ));

        Ok(Self {
            config,
            cache,
            x_api,
            search_service,
        })
    }
}

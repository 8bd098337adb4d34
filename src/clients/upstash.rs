use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::CacheConfig;
use crate::constants::cache::{KEY_NAMESPACE, KEY_VERSION};
use crate::models::Lang;

/// Canonical cache key for a validated search request.
///
/// Keywords are lower-cased, trimmed and sorted so that reordered or recased
/// selections share one entry, then base64-encoded so keyword characters can
/// never collide with the `:` key structure. The caller's credential is
/// deliberately excluded.
#[must_use]
pub fn cache_key(keywords: &[String], hours: u32, lang: Lang) -> String {
    let mut normalized: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    normalized.sort();

    let encoded = BASE64.encode(normalized.join(","));
    format!("{KEY_NAMESPACE}:{KEY_VERSION}:{hours}:{lang}:{encoded}")
}

/// Internal lookup outcome; `Failed` carries the reason for diagnostics but
/// collapses to "absent" at the public boundary.
enum Lookup<T> {
    Hit(T),
    Absent,
    Failed(String),
}

#[derive(Deserialize)]
struct GetReply {
    result: Option<String>,
}

/// Adapter for an Upstash-style Redis REST store.
///
/// Every operation degrades to a no-op when the store is unconfigured or
/// unreachable; callers only ever see "absent" or "not stored".
#[derive(Clone)]
pub struct UpstashClient {
    client: Client,
    rest_url: String,
    rest_token: String,
    enabled: bool,
}

impl UpstashClient {
    #[must_use]
    pub fn new(config: &CacheConfig, client: Client) -> Self {
        let rest_url = config.rest_url.trim_end_matches('/').to_string();
        let enabled = config.enabled && !rest_url.is_empty() && !config.rest_token.is_empty();

        Self {
            client,
            rest_url,
            rest_token: config.rest_token.clone(),
            enabled,
        }
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.lookup(key).await {
            Lookup::Hit(value) => Some(value),
            Lookup::Absent => None,
            Lookup::Failed(reason) => {
                debug!("cache get degraded to miss for {key}: {reason}");
                None
            }
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        if !self.enabled {
            return Lookup::Absent;
        }

        let url = format!("{}/get/{}", self.rest_url, urlencoding::encode(key));
        let response = match self
            .client
            .get(&url)
            .bearer_auth(&self.rest_token)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Lookup::Failed(e.to_string()),
        };

        if !response.status().is_success() {
            return Lookup::Failed(format!("store replied {}", response.status()));
        }

        let reply: GetReply = match response.json().await {
            Ok(r) => r,
            Err(e) => return Lookup::Failed(e.to_string()),
        };

        let Some(raw) = reply.result else {
            return Lookup::Absent;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Lookup::Hit(value),
            Err(e) => Lookup::Failed(format!("malformed cached value: {e}")),
        }
    }

    /// Store `value` under `key`, overwriting any existing entry and
    /// resetting its TTL. Returns whether the store acknowledged the write.
    pub async fn set(&self, key: &str, value: &impl Serialize, ttl_seconds: u64) -> bool {
        if !self.enabled {
            return false;
        }

        let Ok(payload) = serde_json::to_string(value) else {
            return false;
        };

        let url = format!(
            "{}/set/{}/{}?EX={ttl_seconds}",
            self.rest_url,
            urlencoding::encode(key),
            urlencoding::encode(&payload),
        );

        match self
            .client
            .get(&url)
            .bearer_auth(&self.rest_token)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                debug!("cache set for {key} rejected: {}", r.status());
                false
            }
            Err(e) => {
                debug!("cache set for {key} failed: {e}");
                false
            }
        }
    }
}

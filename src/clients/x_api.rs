use std::collections::HashMap;

use chrono::SecondsFormat;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::XApiConfig;
use crate::models::{Lang, TimeWindow};

const RECENT_SEARCH_PATH: &str = "/2/tweets/search/recent";
const POST_FIELDS: &str = "created_at,public_metrics,lang,author_id";
const USER_FIELDS: &str = "username,name";

#[derive(Debug, Error)]
pub enum XApiError {
    /// Non-2xx upstream reply. Status and body are relayed to the caller
    /// unchanged, so no retry happens at this level.
    #[error("X API returned status {status}")]
    Status { status: u16, details: Value },

    #[error("X API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentSearchBody {
    #[serde(default)]
    pub data: Vec<UpstreamPost>,
    #[serde(default)]
    pub includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<XUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamPost {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub created_at: Option<String>,
    pub lang: Option<String>,
    pub author_id: Option<String>,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
}

/// One parsed page of recent-search results, with the user expansion
/// re-keyed by author id for lookup during scoring.
#[derive(Debug, Default)]
pub struct RecentSearchPage {
    pub posts: Vec<UpstreamPost>,
    pub users: HashMap<String, XUser>,
}

impl From<RecentSearchBody> for RecentSearchPage {
    fn from(body: RecentSearchBody) -> Self {
        let users = body
            .includes
            .users
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        Self {
            posts: body.data,
            users,
        }
    }
}

fn escape_keyword(keyword: &str) -> String {
    keyword.replace('"', "\\\"")
}

/// The upstream query: a quoted disjunction over the keywords, reposts
/// excluded, language pinned.
#[must_use]
pub fn build_search_query(keywords: &[String], lang: Lang) -> String {
    let disjunction = keywords
        .iter()
        .map(|k| format!("(\"{}\")", escape_keyword(k)))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!("({disjunction}) -is:retweet lang:{lang}")
}

#[derive(Clone)]
pub struct XSearchClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl XSearchClient {
    #[must_use]
    pub fn new(config: &XApiConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        }
    }

    /// Fetch one page of recent posts matching `query` inside `window`.
    ///
    /// `authorization` is the caller's own `Authorization` header value,
    /// forwarded verbatim. A success reply whose body fails to parse is
    /// treated as an empty result set.
    pub async fn recent_search(
        &self,
        query: &str,
        window: TimeWindow,
        authorization: &str,
    ) -> Result<RecentSearchPage, XApiError> {
        let url = format!("{}{RECENT_SEARCH_PATH}", self.base_url);
        let params = [
            ("query", query.to_string()),
            ("max_results", self.page_size.to_string()),
            (
                "start_time",
                window.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            (
                "end_time",
                window.end.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            ("tweet.fields", POST_FIELDS.to_string()),
            ("expansions", "author_id".to_string()),
            ("user.fields", USER_FIELDS.to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response
                .json::<Value>()
                .await
                .unwrap_or_else(|_| serde_json::json!({ "message": "Unknown error" }));
            return Err(XApiError::Status {
                status: status.as_u16(),
                details,
            });
        }

        let body: RecentSearchBody = response.json().await.unwrap_or_default();
        Ok(RecentSearchPage::from(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_build_search_query() {
        let query = build_search_query(&keywords(&["ai", "chip"]), Lang::Tr);
        assert_eq!(query, r#"(("ai") OR ("chip")) -is:retweet lang:tr"#);
    }

    #[test]
    fn test_build_search_query_single_keyword_en() {
        let query = build_search_query(&keywords(&["rust"]), Lang::En);
        assert_eq!(query, r#"(("rust")) -is:retweet lang:en"#);
    }

    #[test]
    fn test_embedded_quotes_are_escaped() {
        let query = build_search_query(&keywords(&[r#"say "hi""#]), Lang::Tr);
        assert!(query.contains(r#"("say \"hi\"")"#));
    }

    #[test]
    fn test_empty_body_parses_as_empty_page() {
        let body: RecentSearchBody = serde_json::from_str("{}").unwrap();
        let page = RecentSearchPage::from(body);
        assert!(page.posts.is_empty());
        assert!(page.users.is_empty());
    }

    #[test]
    fn test_user_expansion_is_keyed_by_id() {
        let body: RecentSearchBody = serde_json::from_value(serde_json::json!({
            "data": [
                {"id": "1", "text": "hello", "author_id": "u1"}
            ],
            "includes": {"users": [{"id": "u1", "username": "acme", "name": "Acme"}]}
        }))
        .unwrap();

        let page = RecentSearchPage::from(body);
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.users["u1"].username, "acme");
        assert_eq!(page.posts[0].public_metrics.like_count, 0);
    }
}

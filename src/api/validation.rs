use axum::http::{HeaderMap, header};
use serde::Deserialize;

use super::ApiError;
use crate::constants::{limits, window};
use crate::models::{Lang, SearchQuery};

/// Raw, still string-typed query parameters for `GET /search`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub keywords: Option<String>,
    pub hours: Option<String>,
    pub lang: Option<String>,
    pub max: Option<String>,
}

/// Validate the full request. The credential check happens here, before
/// anything that could touch the network; the returned string is the
/// caller's `Authorization` header value, forwarded upstream verbatim.
pub fn validate_search_request(
    params: &SearchParams,
    headers: &HeaderMap,
) -> Result<(SearchQuery, String), ApiError> {
    let raw_keywords = params
        .keywords
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("keywords required"))?;

    let hours = validate_hours(params.hours.as_deref())?;
    let max = parse_max(params.max.as_deref());
    let authorization = bearer_credential(headers)?;

    let keywords = split_keywords(raw_keywords);
    if keywords.is_empty() {
        return Err(ApiError::validation("No valid keywords"));
    }

    let lang = Lang::parse(params.lang.as_deref());

    Ok((
        SearchQuery {
            keywords,
            hours,
            lang,
            max,
        },
        authorization,
    ))
}

fn validate_hours(raw: Option<&str>) -> Result<u32, ApiError> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .and_then(|v| {
            window::ALLOWED_HOURS
                .iter()
                .copied()
                .find(|h| f64::from(*h) == v)
        })
        .ok_or_else(|| ApiError::validation("hours must be one of 1,3,6,12,24"))
}

/// Unparseable values fall back to the default; everything else clamps.
/// Fractional input truncates after clamping.
fn parse_max(raw: Option<&str>) -> usize {
    match raw.and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(v) if v.is_finite() => {
            v.clamp(limits::MIN_RESULTS as f64, limits::MAX_RESULTS as f64) as usize
        }
        _ => limits::DEFAULT_RESULTS,
    }
}

fn bearer_credential(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_bearer(v))
        .map(str::to_string)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header: Bearer <token>"))
}

fn is_bearer(value: &str) -> bool {
    value
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("Bearer "))
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .take(limits::MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn params(keywords: &str, hours: &str) -> SearchParams {
        SearchParams {
            keywords: Some(keywords.to_string()),
            hours: Some(hours.to_string()),
            ..SearchParams::default()
        }
    }

    fn auth_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-123"),
        );
        headers
    }

    #[test]
    fn test_hours_boundaries() {
        assert!(validate_hours(Some("24")).is_ok());
        assert!(validate_hours(Some("1")).is_ok());
        assert!(validate_hours(Some("2")).is_err());
        assert!(validate_hours(Some("abc")).is_err());
        assert!(validate_hours(None).is_err());
    }

    #[test]
    fn test_max_clamping_and_default() {
        assert_eq!(parse_max(Some("0")), 1);
        assert_eq!(parse_max(Some("1000")), 50);
        assert_eq!(parse_max(Some("abc")), 10);
        assert_eq!(parse_max(Some("7.9")), 7);
        assert_eq!(parse_max(Some("-3")), 1);
        assert_eq!(parse_max(None), 10);
    }

    #[test]
    fn test_keyword_list_is_truncated() {
        let csv = (0..70).map(|i| format!("kw{i}")).collect::<Vec<_>>().join(",");
        let list = split_keywords(&csv);
        assert_eq!(list.len(), 60);
        assert_eq!(list[0], "kw0");
        assert_eq!(list[59], "kw59");
    }

    #[test]
    fn test_keywords_trimmed_and_empties_dropped() {
        let list = split_keywords(" ai , , chip ,,");
        assert_eq!(list, ["ai", "chip"]);
    }

    #[test]
    fn test_bearer_prefix_is_case_insensitive() {
        for value in ["Bearer abc", "bearer abc", "BEARER abc"] {
            let mut headers = HeaderMap::new();
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            assert_eq!(bearer_credential(&headers).unwrap(), value);
        }
    }

    #[test]
    fn test_missing_or_malformed_credential() {
        assert!(bearer_credential(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(bearer_credential(&headers).is_err());
    }

    #[test]
    fn test_full_request_happy_path() {
        let (query, auth) =
            validate_search_request(&params("AI, chip", "6"), &auth_headers()).unwrap();
        assert_eq!(query.keywords, ["AI", "chip"]);
        assert_eq!(query.hours, 6);
        assert_eq!(query.lang, Lang::Tr);
        assert_eq!(query.max, 10);
        assert_eq!(auth, "Bearer token-123");
    }

    #[test]
    fn test_lang_normalization() {
        let mut p = params("ai", "6");
        p.lang = Some("EN".to_string());
        let (query, _) = validate_search_request(&p, &auth_headers()).unwrap();
        assert_eq!(query.lang, Lang::En);

        p.lang = Some("de".to_string());
        let (query, _) = validate_search_request(&p, &auth_headers()).unwrap();
        assert_eq!(query.lang, Lang::Tr);
    }

    #[test]
    fn test_only_separators_yields_no_valid_keywords() {
        let err = validate_search_request(&params(" , ,", "6"), &auth_headers()).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(msg) if msg == "No valid keywords"));
    }
}

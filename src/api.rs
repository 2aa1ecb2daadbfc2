//! HTTP access to the news aggregation backend.
//!
//! # Architecture
//!
//! The module uses a trait-based design so the controller can be driven by
//! something other than a live server:
//! - [`NewsApi`]: Core trait defining one async search call
//! - [`HttpNewsApi`]: `reqwest` implementation against `GET /api/news`
//!
//! # Request
//!
//! ```text
//! GET {base_url}/api/news?keyword=..&logic=OR|AND&start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
//! ```
//!
//! There is no retry, no backoff, and no timeout. A failed attempt is
//! returned to the caller as-is.

use crate::error::SearchResult;
use crate::models::{Logic, NewsResponse};
use crate::utils::{format_date, truncate_for_log};
use chrono::NaiveDate;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Path of the search endpoint on the backend.
pub const DEFAULT_ENDPOINT: &str = "/api/news";

/// A validated set of query parameters for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery<'a> {
    pub keyword: &'a str,
    pub logic: Logic,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SearchQuery<'_> {
    /// Query pairs in the order the backend documents them.
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            ("keyword", self.keyword.to_string()),
            ("logic", self.logic.as_str().to_string()),
            ("start_date", format_date(&self.start_date)),
            ("end_date", format_date(&self.end_date)),
        ]
    }
}

/// Trait for an async news search backend.
///
/// Implementors send one request per call and hand back the decoded
/// envelope. Interpreting `success: false` is left to the caller.
pub trait NewsApi {
    /// Issue a single search request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`](crate::error::SearchError::Transport)
    /// when the request cannot be sent or the body is not a valid envelope.
    async fn search(&self, query: &SearchQuery<'_>) -> SearchResult<NewsResponse>;
}

/// [`NewsApi`] backed by a real HTTP server.
pub struct HttpNewsApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpNewsApi {
    /// Build a client for `endpoint` resolved against `base_url`.
    ///
    /// An absolute `endpoint` path replaces any path on `base_url`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let api = HttpNewsApi::new("http://127.0.0.1:5000", "/api/news")?;
    /// ```
    pub fn new(base_url: &str, endpoint: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(base_url)?.join(endpoint)?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL with percent-encoded query parameters.
    pub fn search_url(&self, query: &SearchQuery<'_>) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().extend_pairs(query.pairs());
        url
    }
}

impl fmt::Debug for HttpNewsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpNewsApi")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl NewsApi for HttpNewsApi {
    #[instrument(level = "info", skip_all, fields(keyword = %query.keyword, logic = %query.logic))]
    async fn search(&self, query: &SearchQuery<'_>) -> SearchResult<NewsResponse> {
        let url = self.search_url(query);
        debug!(%url, "Requesting news");

        let t0 = Instant::now();
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        // The backend reports failures as JSON with a 5xx status, so the body
        // is decoded regardless of status.
        let body = resp.text().await?;
        info!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Backend responded"
        );

        match serde_json::from_str::<NewsResponse>(&body) {
            Ok(parsed) => {
                debug!(success = parsed.success, count = ?parsed.count, items = parsed.data.len(), "Decoded news envelope");
                Ok(parsed)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    status = status.as_u16(),
                    body_preview = %truncate_for_log(&body, 300),
                    "Response is not a news envelope"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use mockito::Matcher;

    fn query(keyword: &str) -> SearchQuery<'_> {
        SearchQuery {
            keyword,
            logic: Logic::And,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[test]
    fn test_endpoint_resolution() {
        let api = HttpNewsApi::new("http://127.0.0.1:5000", DEFAULT_ENDPOINT).unwrap();
        assert_eq!(api.endpoint().as_str(), "http://127.0.0.1:5000/api/news");

        let api = HttpNewsApi::new("https://news.example.com/ignored/", "/api/news").unwrap();
        assert_eq!(api.endpoint().as_str(), "https://news.example.com/api/news");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpNewsApi::new("not a url", DEFAULT_ENDPOINT).is_err());
    }

    #[test]
    fn test_search_url_encoding() {
        let api = HttpNewsApi::new("http://localhost:5000", DEFAULT_ENDPOINT).unwrap();
        let url = api.search_url(&query("NVIDIA,台積電"));

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("keyword".to_string(), "NVIDIA,台積電".to_string()),
                ("logic".to_string(), "AND".to_string()),
                ("start_date".to_string(), "2024-03-05".to_string()),
                ("end_date".to_string(), "2024-12-31".to_string()),
            ]
        );
        assert!(!url.as_str().contains("台"));
    }

    #[tokio::test]
    async fn test_search_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/news")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("keyword".into(), "海科館".into()),
                Matcher::UrlEncoded("logic".into(), "AND".into()),
                Matcher::UrlEncoded("start_date".into(), "2024-03-05".into()),
                Matcher::UrlEncoded("end_date".into(), "2024-12-31".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "count": 1, "data": [{"標題": "t"}], "stats": {"中央社": 1}}"#)
            .create_async()
            .await;

        let api = HttpNewsApi::new(&server.url(), DEFAULT_ENDPOINT).unwrap();
        let resp = api.search(&query("海科館")).await.unwrap();

        mock.assert_async().await;
        assert!(resp.success);
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].title(), Some("t"));
    }

    #[tokio::test]
    async fn test_search_failure_body_on_500() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/news")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false, "error": "time data '2024-13-01' does not match format"}"#)
            .create_async()
            .await;

        let api = HttpNewsApi::new(&server.url(), DEFAULT_ENDPOINT).unwrap();
        let resp = api.search(&query("x")).await.unwrap();

        assert!(!resp.success);
        assert_eq!(
            resp.error.as_deref(),
            Some("time data '2024-13-01' does not match format")
        );
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/news")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let api = HttpNewsApi::new(&server.url(), DEFAULT_ENDPOINT).unwrap();
        let err = api.search(&query("x")).await.unwrap_err();

        assert!(matches!(err, SearchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_search_connection_refused() {
        // Bind then drop to get a port with nothing listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let api = HttpNewsApi::new(&format!("http://127.0.0.1:{port}"), DEFAULT_ENDPOINT).unwrap();

        let err = api.search(&query("x")).await.unwrap_err();
        match err {
            SearchError::Transport(detail) => assert!(!detail.is_empty()),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}

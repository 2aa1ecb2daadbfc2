//! Error types for a single search invocation.
//!
//! Every variant is terminal for that invocation; nothing is retried. The
//! `Display` output is exactly the message shown to the user, so the
//! controller can store `err.to_string()` in the view state.

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while running a search
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Keyword is empty after trimming
    #[error("please enter a search keyword")]
    EmptyKeyword,

    /// Start or end date is unset
    #[error("please select start and end dates")]
    MissingDates,

    /// Backend answered with `success: false`
    #[error("fetch failed: {0}")]
    Application(String),

    /// Network failure, malformed body, or anything else during the request
    #[error("network or server error occurred: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(error_chain(&err))
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

/// Render an error and all of its sources as `outer: inner: root`.
///
/// reqwest's top-level message omits the cause (e.g. "connection refused").
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

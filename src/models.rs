//! Data models for search criteria, backend responses, and view state.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SearchCriteria`]: The user-editable search parameters
//! - [`NewsItem`] and [`SearchStats`]: Opaque records returned by the backend
//! - [`NewsResponse`]: The JSON envelope of `/api/news`
//! - [`SearchOutcome`] and [`ViewState`]: What the rendering layer consumes
//!
//! Article records keep the backend's own (Chinese) field names, so the
//! accessors on [`NewsItem`] look them up by those keys.

use crate::error::{SearchError, SearchResult};
use crate::utils::{default_date_range, format_date};
use chrono::{Local, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Keyword searched when the view first opens.
pub const DEFAULT_KEYWORD: &str = "海科館";

/// Boolean combination mode applied by the backend to multiple keyword terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Logic {
    #[default]
    #[serde(rename = "OR", alias = "or")]
    Or,
    #[serde(rename = "AND", alias = "and")]
    And,
}

impl Logic {
    /// The wire form sent as the `logic` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::Or => "OR",
            Logic::And => "AND",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Logic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OR" => Ok(Logic::Or),
            "AND" => Ok(Logic::And),
            other => Err(format!("unknown logic '{other}', expected OR or AND")),
        }
    }
}

/// The user-specified search parameters.
///
/// Dates are optional so an unset date picker can be represented; a search
/// only proceeds when both are present and the keyword is not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub keyword: String,
    pub logic: Logic,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SearchCriteria {
    /// Default criteria relative to a given local `today`.
    pub fn with_today(today: NaiveDate) -> Self {
        let (start, end) = default_date_range(today);
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            logic: Logic::Or,
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    /// Short single-line description used in headers and logs.
    pub fn summary(&self) -> String {
        let date = |d: &Option<NaiveDate>| d.as_ref().map(format_date).unwrap_or_else(|| "?".to_string());
        format!(
            "\"{}\" ({}) {} → {}",
            self.keyword,
            self.logic,
            date(&self.start_date),
            date(&self.end_date)
        )
    }
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::with_today(Local::now().date_naive())
    }
}

/// A single article as returned by the backend.
///
/// The record shape belongs to the backend, so the whole JSON value is kept
/// and serialized back out untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct NewsItem(pub Value);

impl NewsItem {
    fn field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("標題")
    }

    pub fn link(&self) -> Option<&str> {
        self.field("連結")
    }

    /// Publication time, `YYYY-MM-DD HH:MM:SS`.
    pub fn published(&self) -> Option<&str> {
        self.field("發布時間")
    }

    pub fn source(&self) -> Option<&str> {
        self.field("來源")
    }

    /// The keyword term this article matched.
    pub fn keyword(&self) -> Option<&str> {
        self.field("關鍵字")
    }
}

/// Summary record returned alongside results.
///
/// In practice this is an object mapping source name to article count.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SearchStats(pub Value);

impl SearchStats {
    /// Per-source counts, highest first, ties broken by name.
    ///
    /// Entries whose value is not a non-negative integer are skipped.
    pub fn source_counts(&self) -> Vec<(String, u64)> {
        match &self.0 {
            Value::Object(map) => map
                .iter()
                .filter_map(|(name, count)| count.as_u64().map(|c| (name.clone(), c)))
                .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// JSON envelope returned by `GET /api/news`.
///
/// `error` is only meaningful when `success` is false.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<NewsItem>,
    #[serde(default)]
    pub stats: SearchStats,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl NewsResponse {
    /// Interpret the envelope: `success: true` yields the data and stats,
    /// anything else becomes an application error.
    pub fn into_result(self) -> SearchResult<(Vec<NewsItem>, SearchStats)> {
        if self.success {
            Ok((self.data, self.stats))
        } else {
            let reason = self.error.unwrap_or_else(|| "unknown error".to_string());
            Err(SearchError::Application(reason))
        }
    }
}

/// The result of one search attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results {
        results: Vec<NewsItem>,
        stats: SearchStats,
    },
    Error(String),
}

/// Everything the rendering layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub criteria: SearchCriteria,
    pub outcome: Option<SearchOutcome>,
    pub is_loading: bool,
}

impl ViewState {
    pub fn new(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            outcome: None,
            is_loading: false,
        }
    }

    /// Results of the last successful search, or an empty slice.
    pub fn results(&self) -> &[NewsItem] {
        match &self.outcome {
            Some(SearchOutcome::Results { results, .. }) => results,
            _ => &[],
        }
    }

    pub fn stats(&self) -> Option<&SearchStats> {
        match &self.outcome {
            Some(SearchOutcome::Results { stats, .. }) => Some(stats),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(SearchOutcome::Error(msg)) => Some(msg),
            _ => None,
        }
    }
}

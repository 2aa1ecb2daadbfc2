//! JSON export of the last successful search.
//!
//! The file keeps the backend's article records untouched and records the
//! criteria that produced them:
//!
//! ```text
//! {
//!   "criteria": { "keyword": "海科館", "logic": "OR", "start_date": "2024-03-05", "end_date": "2024-03-12" },
//!   "count": 3,
//!   "data": [ ... ],
//!   "stats": { "中央社": 2, ... }
//! }
//! ```

use crate::models::{Logic, NewsItem, SearchStats, ViewState};
use crate::utils::format_date;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
struct ExportCriteria<'a> {
    keyword: &'a str,
    logic: Logic,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct Export<'a> {
    criteria: ExportCriteria<'a>,
    count: usize,
    data: &'a [NewsItem],
    stats: &'a SearchStats,
}

/// Serialize the result set held by `state` as pretty JSON.
///
/// # Errors
///
/// Returns an error if the state holds no result set (nothing searched yet,
/// still loading, or the last search failed).
pub fn results_to_json(state: &ViewState) -> Result<String, Box<dyn Error>> {
    let stats = state
        .stats()
        .ok_or("no search results to export")?;
    let data = state.results();
    let criteria = &state.criteria;
    let export = Export {
        criteria: ExportCriteria {
            keyword: &criteria.keyword,
            logic: criteria.logic,
            start_date: criteria.start_date.as_ref().map(format_date),
            end_date: criteria.end_date.as_ref().map(format_date),
        },
        count: data.len(),
        data,
        stats,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Write the current result set to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_results(state: &ViewState, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = results_to_json(state)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(count = state.results().len(), "Wrote search results JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchCriteria, SearchOutcome};
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn searched() -> ViewState {
        let mut state = ViewState::new(SearchCriteria::with_today(
            NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
        ));
        state.outcome = Some(SearchOutcome::Results {
            results: vec![NewsItem(json!({"標題": "t", "連結": "https://a", "extra": [1]}))],
            stats: SearchStats(json!({"中央社": 1})),
        });
        state
    }

    #[test]
    fn test_results_to_json() {
        let json = results_to_json(&searched()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value["criteria"],
            json!({"keyword": "海科館", "logic": "OR", "start_date": "2024-03-05", "end_date": "2024-03-12"})
        );
        assert_eq!(value["count"], 1);
        assert_eq!(value["data"][0], json!({"標題": "t", "連結": "https://a", "extra": [1]}));
        assert_eq!(value["stats"], json!({"中央社": 1}));
    }

    #[test]
    fn test_results_to_json_without_results() {
        let mut state = searched();
        state.outcome = Some(SearchOutcome::Error("fetch failed: X".to_string()));
        assert!(results_to_json(&state).is_err());

        state.outcome = None;
        assert!(results_to_json(&state).is_err());
    }

    #[tokio::test]
    async fn test_write_results_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/news.json");

        write_results(&searched(), &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["count"], 1);
    }

    #[tokio::test]
    async fn test_write_results_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let result = write_results(&searched(), &blocker.join("news.json")).await;

        assert!(result.is_err());
    }
}

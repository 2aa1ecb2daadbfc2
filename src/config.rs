//! Runtime settings assembled from defaults, an optional YAML file, and the CLI.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults (`http://127.0.0.1:5000`, `/api/news`, "海科館", OR, 7 days)
//! 2. Values present in the YAML file passed with `--config`
//! 3. Command-line flags and environment variables
//!
//! # Example file
//!
//! ```yaml
//! base_url: "http://news.internal:5000"
//! keyword: "NVIDIA,台積電,AI伺服器"
//! logic: AND
//! lookback_days: 14
//! ```

use crate::api::DEFAULT_ENDPOINT;
use crate::cli::Cli;
use crate::models::{DEFAULT_KEYWORD, Logic, SearchCriteria};
use crate::utils::{DEFAULT_LOOKBACK_DAYS, lookback_range};
use chrono::NaiveDate;
use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{debug, info, instrument};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub keyword: Option<String>,
    pub logic: Option<Logic>,
    pub lookback_days: Option<u32>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub endpoint: String,
    pub criteria: SearchCriteria,
}

/// Parse a YAML config document.
pub fn parse_config(yaml: &str) -> Result<FileConfig, serde_yaml::Error> {
    // An empty file deserializes to unit, not to an empty mapping.
    if yaml.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(yaml)
}

/// Read and parse the YAML config file at `path`.
#[instrument(level = "info")]
pub async fn load_config(path: &str) -> Result<FileConfig, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let config = parse_config(&raw)?;
    debug!(?config, "Parsed config file");
    Ok(config)
}

/// Merge CLI flags over the file config over the defaults.
pub fn resolve(cli: &Cli, file: FileConfig, today: NaiveDate) -> Settings {
    let lookback = file
        .lookback_days
        .map(i64::from)
        .unwrap_or(DEFAULT_LOOKBACK_DAYS);
    let (default_start, default_end) = lookback_range(today, lookback);

    let criteria = SearchCriteria {
        keyword: cli
            .keyword
            .clone()
            .or(file.keyword)
            .unwrap_or_else(|| DEFAULT_KEYWORD.to_string()),
        logic: cli.logic.or(file.logic).unwrap_or_default(),
        start_date: Some(cli.start_date.unwrap_or(default_start)),
        end_date: Some(cli.end_date.unwrap_or(default_end)),
    };

    Settings {
        base_url: cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        endpoint: cli
            .endpoint
            .clone()
            .or(file.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        criteria,
    }
}

/// Load the config file named on the command line (if any) and resolve settings.
pub async fn load_settings(cli: &Cli, today: NaiveDate) -> Result<Settings, Box<dyn Error>> {
    let file = match &cli.config {
        Some(path) => load_config(path).await?,
        None => FileConfig::default(),
    };
    let settings = resolve(cli, file, today);
    info!(
        base_url = %settings.base_url,
        endpoint = %settings.endpoint,
        criteria = %settings.criteria.summary(),
        "Resolved settings"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["news_search"]);
        let settings = resolve(&cli, FileConfig::default(), today());

        assert_eq!(settings.base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.endpoint, "/api/news");
        assert_eq!(settings.criteria, SearchCriteria::with_today(today()));
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            "base_url: \"http://news.internal:5000\"\nkeyword: \"NVIDIA,台積電\"\nlogic: AND\nlookback_days: 14\n",
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://news.internal:5000"));
        assert_eq!(config.keyword.as_deref(), Some("NVIDIA,台積電"));
        assert_eq!(config.logic, Some(Logic::And));
        assert_eq!(config.lookback_days, Some(14));
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_parse_config_empty_and_invalid() {
        assert_eq!(parse_config("").unwrap(), FileConfig::default());
        assert!(parse_config("logic: XOR\n").is_err());
        assert!(parse_config("lookback_days: -3\n").is_err());
        assert!(parse_config("unknown_key: 1\n").is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let cli = Cli::parse_from(["news_search"]);
        let file = FileConfig {
            keyword: Some("台積電".to_string()),
            logic: Some(Logic::And),
            lookback_days: Some(30),
            ..Default::default()
        };
        let settings = resolve(&cli, file, today());

        assert_eq!(settings.criteria.keyword, "台積電");
        assert_eq!(settings.criteria.logic, Logic::And);
        assert_eq!(settings.criteria.start_date, NaiveDate::from_ymd_opt(2024, 2, 11));
        assert_eq!(settings.criteria.end_date, Some(today()));
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from([
            "news_search",
            "-k",
            "海科館",
            "-l",
            "OR",
            "-s",
            "2024-01-01",
            "--base-url",
            "http://cli:1",
        ]);
        let file = FileConfig {
            base_url: Some("http://file:2".to_string()),
            keyword: Some("台積電".to_string()),
            logic: Some(Logic::And),
            lookback_days: Some(30),
            ..Default::default()
        };
        let settings = resolve(&cli, file, today());

        assert_eq!(settings.base_url, "http://cli:1");
        assert_eq!(settings.criteria.keyword, "海科館");
        assert_eq!(settings.criteria.logic, Logic::Or);
        assert_eq!(settings.criteria.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        // end date still comes from the lookback window
        assert_eq!(settings.criteria.end_date, Some(today()));
    }

    #[tokio::test]
    async fn test_load_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint: /v2/news\nlookback_days: 1").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["news_search", "--config", path.as_str()]);
        let settings = load_settings(&cli, today()).await.unwrap();

        assert_eq!(settings.endpoint, "/v2/news");
        assert_eq!(settings.criteria.start_date, NaiveDate::from_ymd_opt(2024, 3, 11));
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/news_search.yaml").await.is_err());
    }
}

//! Command-line interface definitions for News Search.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Anything left unset falls back to the config file and then to the
//! built-in defaults (see [`crate::config`]).

use crate::models::Logic;
use chrono::NaiveDate;
use clap::Parser;

/// Command-line arguments for the News Search application.
///
/// # Examples
///
/// ```sh
/// # Default search: "海科館", OR, last seven days
/// news_search
///
/// # Several terms that must all match, fixed range, saved to disk
/// news_search -k "NVIDIA,台積電" -l AND -s 2024-03-01 -e 2024-03-31 -j ./out/news.json
///
/// # Keep editing criteria and searching again
/// news_search --interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the news backend
    #[arg(long, env = "NEWS_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Path of the search endpoint on the backend
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Search keyword (comma-separated terms are combined by --logic)
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// How multiple terms are combined: OR or AND
    #[arg(short, long)]
    pub logic: Option<Logic>,

    /// First day of the range, YYYY-MM-DD
    #[arg(short, long)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the range, YYYY-MM-DD
    #[arg(short, long)]
    pub end_date: Option<NaiveDate>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write the results of the last successful search to this JSON file
    #[arg(short, long)]
    pub json_output: Option<String>,

    /// Read commands from stdin after the initial search
    #[arg(short, long)]
    pub interactive: bool,
}

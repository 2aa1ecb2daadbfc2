//! # News Search
//!
//! A terminal client for a news aggregation backend. It searches by keyword,
//! OR/AND logic, and date range, then prints the matching articles and a
//! per-source breakdown.
//!
//! ## Usage
//!
//! ```sh
//! news_search -k "NVIDIA,台積電" -l OR -s 2024-03-01 -e 2024-03-07
//! ```
//!
//! ## Architecture
//!
//! 1. **Settings**: defaults, then the YAML config file, then CLI flags
//! 2. **Controller**: owns the view state and issues one `GET /api/news` per search
//! 3. **Rendering**: an observer prints the view on every state change
//! 4. **Lifecycle**: one automatic search at startup, optional interactive
//!    loop, optional JSON export of the final result set

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod controller;
mod error;
mod models;
mod outputs;
mod repl;
mod utils;

use api::HttpNewsApi;
use cli::Cli;
use controller::SearchController;
use outputs::{json, terminal};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    // stdout carries the rendered view, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_search starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = match config::load_settings(&args, Local::now().date_naive()).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(config = ?args.config, error = %e, "Failed to load settings");
            return Err(e);
        }
    };

    let api = match HttpNewsApi::new(&settings.base_url, &settings.endpoint) {
        Ok(api) => api,
        Err(e) => {
            error!(base_url = %settings.base_url, endpoint = %settings.endpoint, error = %e, "Invalid backend URL");
            return Err(e.into());
        }
    };
    info!(endpoint = %api.endpoint(), "Backend configured");

    let mut controller = SearchController::new(api, settings.criteria);
    controller.subscribe(|state| print!("{}", terminal::render(state)));

    // ---- Initial search ----
    controller.initialize().await;

    // ---- Interactive loop ----
    if args.interactive {
        print!("{}", repl::HELP);
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        repl::run(&mut controller, stdin, &mut stdout).await?;
    }

    // ---- JSON export ----
    if let Some(path) = &args.json_output {
        if let Err(e) = json::write_results(controller.state(), Path::new(path)).await {
            error!(path = %path, error = %e, "Failed to write JSON output");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    let failed = controller.state().error().is_some();
    info!(
        ?elapsed,
        results = controller.state().results().len(),
        failed,
        "Execution complete"
    );

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

//! Plain-text rendering of the view state.
//!
//! This is the terminal counterpart of the search page: a criteria header,
//! a loading or error line, the per-source statistics, and one block per
//! article.
//!
//! # Layout
//!
//! ```text
//! Search: "海科館" (OR) 2024-03-05 → 2024-03-12
//! Found 3 articles
//!
//! Sources:
//!      2  中央社
//!      1  聯合新聞網
//!
//! [2024-03-11 09:00:00] Title (中央社)
//!     https://...
//! ```

use crate::models::{NewsItem, SearchOutcome, ViewState};
use std::fmt::Write;

/// Render the complete view for the current state.
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();
    writeln!(out, "Search: {}", state.criteria.summary()).unwrap();

    if state.is_loading {
        writeln!(out, "Searching…").unwrap();
        return out;
    }

    match &state.outcome {
        None => {}
        Some(SearchOutcome::Error(msg)) => {
            writeln!(out, "Error: {msg}").unwrap();
        }
        Some(SearchOutcome::Results { results, stats }) => {
            if results.is_empty() {
                writeln!(out, "No news found").unwrap();
                return out;
            }
            writeln!(out, "Found {} articles", results.len()).unwrap();

            let counts = stats.source_counts();
            if !counts.is_empty() {
                writeln!(out, "\nSources:").unwrap();
                for (source, count) in counts {
                    writeln!(out, "{count:>6}  {source}").unwrap();
                }
            }

            writeln!(out).unwrap();
            for item in results {
                out.push_str(&render_item(item));
            }
        }
    }
    out
}

/// One article as a headline line plus an indented link.
pub fn render_item(item: &NewsItem) -> String {
    let mut out = String::new();
    let title = item.title().unwrap_or("(untitled)");
    match item.published() {
        Some(published) => write!(out, "[{published}] {title}").unwrap(),
        None => write!(out, "{title}").unwrap(),
    }
    if let Some(source) = item.source() {
        write!(out, " ({source})").unwrap();
    }
    if let Some(keyword) = item.keyword() {
        write!(out, " #{keyword}").unwrap();
    }
    writeln!(out).unwrap();
    if let Some(link) = item.link() {
        writeln!(out, "    {link}").unwrap();
    }
    out
}

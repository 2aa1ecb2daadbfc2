//! The search controller: criteria in, view state out.
//!
//! [`SearchController`] owns the single [`ViewState`] of the application.
//! Each call to [`SearchController::run_search`] validates the current
//! criteria, issues at most one backend request, and folds the response into
//! either a result set or an error message. Observers registered with
//! [`SearchController::subscribe`] are called after every state transition,
//! which is how the rendering layer stays in sync.
//!
//! # State transitions
//!
//! ```text
//! invalid criteria:  outcome = Error(msg)                       -> notify
//! valid criteria:    is_loading = true, outcome = None           -> notify
//!                    request resolves
//!                    outcome = Results | Error, is_loading = false -> notify
//! ```
//!
//! `run_search` borrows the controller mutably, so two searches on the same
//! controller can never be in flight at once.

use crate::api::{NewsApi, SearchQuery};
use crate::error::{SearchError, SearchResult};
use crate::models::{Logic, NewsResponse, SearchCriteria, SearchOutcome, ViewState};
use chrono::NaiveDate;
use std::fmt;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Callback invoked with the new state after each transition.
pub type Subscriber = Box<dyn FnMut(&ViewState)>;

pub struct SearchController<A> {
    api: A,
    state: ViewState,
    subscribers: Vec<Subscriber>,
    initialized: bool,
}

impl<A> fmt::Debug for SearchController<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchController")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// Check that a search may be issued and return the date range.
///
/// The keyword check comes first, matching the order the user sees errors in.
pub fn validate(criteria: &SearchCriteria) -> SearchResult<(NaiveDate, NaiveDate)> {
    if criteria.keyword.trim().is_empty() {
        return Err(SearchError::EmptyKeyword);
    }
    match (criteria.start_date, criteria.end_date) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(SearchError::MissingDates),
    }
}

impl<A: NewsApi> SearchController<A> {
    pub fn new(api: A, criteria: SearchCriteria) -> Self {
        Self {
            api,
            state: ViewState::new(criteria),
            subscribers: Vec::new(),
            initialized: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.state.criteria
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.state.criteria.keyword = keyword.into();
    }

    pub fn set_logic(&mut self, logic: Logic) {
        self.state.criteria.logic = logic;
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.state.criteria.start_date = date;
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.state.criteria.end_date = date;
    }

    /// Register an observer. It is not called until the next transition.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&ViewState) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&mut self) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }

    /// Run the first search with whatever criteria the controller was built
    /// with. Only the first call does anything; returns whether it ran.
    pub async fn initialize(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        info!("Running initial search");
        self.run_search().await;
        true
    }

    /// Validate the current criteria and, if they pass, query the backend.
    ///
    /// Never fails: every error ends up as [`SearchOutcome::Error`] in the
    /// returned state. `is_loading` is always false when this returns.
    #[instrument(level = "info", skip_all)]
    pub async fn run_search(&mut self) -> &ViewState {
        let (start_date, end_date) = match validate(&self.state.criteria) {
            Ok(range) => range,
            Err(e) => {
                warn!(error = %e, "Search rejected before sending");
                self.state.outcome = Some(SearchOutcome::Error(e.to_string()));
                self.notify();
                return &self.state;
            }
        };

        self.state.is_loading = true;
        self.state.outcome = None;
        self.notify();

        let t0 = Instant::now();
        let result = {
            let query = SearchQuery {
                keyword: &self.state.criteria.keyword,
                logic: self.state.criteria.logic,
                start_date,
                end_date,
            };
            info!(criteria = %self.state.criteria.summary(), "Searching");
            self.api
                .search(&query)
                .await
                .and_then(NewsResponse::into_result)
        };

        self.state.outcome = Some(match result {
            Ok((results, stats)) => {
                info!(
                    count = results.len(),
                    sources = stats.source_counts().len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Search completed"
                );
                SearchOutcome::Results { results, stats }
            }
            Err(e) => {
                error!(error = %e, elapsed_ms = t0.elapsed().as_millis() as u64, "Search failed");
                SearchOutcome::Error(e.to_string())
            }
        });
        self.state.is_loading = false;
        self.notify();

        &self.state
    }
}

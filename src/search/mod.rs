use crate::models::{self, MovieSummary, Pagination, PosterSize};
use crate::omdb::{OmdbClient, SearchResponse};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

pub const NO_RESULTS_MESSAGE: &str = "No movies found";
pub const SEARCH_FAILED_MESSAGE: &str =
    "Failed to search movies. Please check your connection and try again.";

/// Observable state of the current search.
///
/// `has_error` and a non-empty `results` list never hold at the same time
/// once a search has resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<MovieSummary>,
    pub current_page: u32,
    pub total_results: u32,
    pub is_loading: bool,
    pub has_error: bool,
    pub error_message: String,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            current_page: 1,
            total_results: 0,
            is_loading: false,
            has_error: false,
            error_message: String::new(),
        }
    }
}

impl SearchState {
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn total_pages(&self) -> u32 {
        models::total_pages(self.total_results)
    }

    pub fn pagination(&self) -> Pagination {
        let total_pages = self.total_pages();
        Pagination {
            current_page: self.current_page,
            total_pages,
            total_results: self.total_results,
            has_next_page: self.current_page < total_pages,
            has_prev_page: self.current_page > 1,
        }
    }

    fn fail(&mut self, message: String) {
        self.results.clear();
        self.total_results = 0;
        self.has_error = true;
        self.error_message = message;
    }
}

/// Movie search over OMDb with observable, pageable results.
///
/// Overlapping calls are not fenced: whichever response resolves last
/// determines the state.
#[derive(Debug)]
pub struct MovieSearch {
    omdb: OmdbClient,
    state: watch::Sender<SearchState>,
}

impl MovieSearch {
    pub fn new(omdb: OmdbClient) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self { omdb, state }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn has_results(&self) -> bool {
        self.state.borrow().has_results()
    }

    pub fn total_pages(&self) -> u32 {
        self.state.borrow().total_pages()
    }

    pub fn pagination(&self) -> Pagination {
        self.state.borrow().pagination()
    }

    /// Runs a search for `page` of `query`. Blank queries are ignored.
    ///
    /// Failures end up in `has_error` / `error_message`, never in a return value.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) {
        if query.trim().is_empty() {
            return;
        }

        self.state.send_modify(|state| {
            state.is_loading = true;
            state.has_error = false;
            state.error_message.clear();
            state.current_page = page;
            state.query = query.to_string();
        });

        let outcome = self.omdb.search(query, page).await;

        self.state.send_modify(|state| {
            match outcome {
                Ok(response) => apply_response(state, response),
                Err(e) => {
                    error!("Search error: {:#}", e);
                    state.fail(SEARCH_FAILED_MESSAGE.to_string());
                }
            }
            state.is_loading = false;
        });
    }

    /// Re-runs the last query on the following page, if there is one.
    pub async fn next_page(&self) {
        let (query, pagination) = {
            let state = self.state.borrow();
            (state.query.clone(), state.pagination())
        };
        if pagination.has_next_page {
            self.search(&query, pagination.current_page + 1).await;
        }
    }

    pub async fn prev_page(&self) {
        let (query, pagination) = {
            let state = self.state.borrow();
            (state.query.clone(), state.pagination())
        };
        if pagination.has_prev_page {
            self.search(&query, pagination.current_page - 1).await;
        }
    }

    pub fn clear(&self) {
        self.state.send_modify(|state| {
            let is_loading = state.is_loading;
            *state = SearchState {
                is_loading,
                ..SearchState::default()
            };
        });
    }
}

fn apply_response(state: &mut SearchState, response: SearchResponse) {
    if !response.is_success() {
        let message = response
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| NO_RESULTS_MESSAGE.to_string());
        warn!("Search returned no results: {}", message);
        state.fail(message);
        return;
    }

    let total_results = response.total_results();
    let results: Vec<_> = response
        .search
        .into_iter()
        .map(|mut movie| {
            models::normalize_poster(&mut movie.poster_url, &movie.title, PosterSize::Card);
            movie
        })
        .collect();

    if results.is_empty() {
        warn!("Search reported success with an empty result list");
        state.fail(NO_RESULTS_MESSAGE.to_string());
        return;
    }

    info!("Search returned {} of {} results", results.len(), total_results);
    state.results = results;
    state.total_results = total_results;
}

use crate::models::{self, MovieDetails, PosterSize};
use crate::omdb::{DetailsResponse, OmdbClient};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

pub const DETAILS_NOT_FOUND_MESSAGE: &str = "Movie details not found";
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to load movie details. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsState {
    pub details: Option<MovieDetails>,
    pub is_loading: bool,
    pub has_error: bool,
    pub error_message: String,
}

impl DetailsState {
    fn fail(&mut self, message: String) {
        self.details = None;
        self.has_error = true;
        self.error_message = message;
    }
}

/// Loads one movie record at a time; each fetch replaces the previous one.
#[derive(Debug)]
pub struct MovieDetailsLoader {
    omdb: OmdbClient,
    state: watch::Sender<DetailsState>,
}

impl MovieDetailsLoader {
    pub fn new(omdb: OmdbClient) -> Self {
        let (state, _) = watch::channel(DetailsState::default());
        Self { omdb, state }
    }

    pub fn state(&self) -> DetailsState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailsState> {
        self.state.subscribe()
    }

    pub fn details(&self) -> Option<MovieDetails> {
        self.state.borrow().details.clone()
    }

    #[instrument(skip(self))]
    pub async fn fetch_details(&self, id: &str) {
        if id.trim().is_empty() {
            return;
        }

        self.state.send_modify(|state| {
            state.is_loading = true;
            state.has_error = false;
            state.error_message.clear();
        });

        let outcome = self.omdb.details(id).await;

        self.state.send_modify(|state| {
            match outcome {
                Ok(response) => apply_response(state, response),
                Err(e) => {
                    error!("Details error: {:#}", e);
                    state.fail(DETAILS_FAILED_MESSAGE.to_string());
                }
            }
            state.is_loading = false;
        });
    }

    pub fn clear(&self) {
        self.state.send_modify(|state| {
            state.details = None;
            state.has_error = false;
            state.error_message.clear();
        });
    }
}

fn apply_response(state: &mut DetailsState, response: DetailsResponse) {
    if !response.is_success() {
        let message = response
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DETAILS_NOT_FOUND_MESSAGE.to_string());
        warn!("Details lookup failed: {}", message);
        state.fail(message);
        return;
    }

    let mut details = response.details;
    models::normalize_poster(&mut details.poster_url, &details.title, PosterSize::Full);
    info!("Loaded details for '{}' ({})", details.title, details.id);
    state.details = Some(details);
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream marker for "field not available".
pub const NOT_AVAILABLE: &str = "N/A";

/// Results per upstream search page.
pub const PAGE_SIZE: u32 = 10;

const PLACEHOLDER_BASE: &str = "https://via.placeholder.com";
const PLACEHOLDER_COLORS: &str = "1e293b/f1f5f9";

/// Movie record as it appears in a search result list.
///
/// Field names follow the upstream JSON so the same shape is used on the
/// wire and in persisted favorites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster_url: String,
    #[serde(rename = "Type", default)]
    pub media_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster")]
    pub poster_url: String,
    #[serde(rename = "Type")]
    pub media_type: String,
    #[serde(rename = "Rated")]
    pub rated: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Writer")]
    pub writer: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Awards")]
    pub awards: String,
    #[serde(rename = "Ratings")]
    pub ratings: Vec<Rating>,
    #[serde(rename = "Metascore")]
    pub metascore: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    #[serde(rename = "DVD", skip_serializing_if = "Option::is_none")]
    pub dvd: Option<String>,
    #[serde(rename = "BoxOffice", skip_serializing_if = "Option::is_none")]
    pub box_office: Option<String>,
    #[serde(rename = "Production", skip_serializing_if = "Option::is_none")]
    pub production: Option<String>,
    #[serde(rename = "Website", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "Response")]
    pub response: String,
}

impl MovieDetails {
    /// Summary of this record as a search result would show it. A
    /// details-sized placeholder poster is swapped for the card-sized one.
    pub fn summary(&self) -> MovieSummary {
        let poster_url = if self.poster_url == placeholder_poster(&self.title, PosterSize::Full) {
            placeholder_poster(&self.title, PosterSize::Card)
        } else {
            self.poster_url.clone()
        };

        MovieSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster_url,
            media_type: self.media_type.clone(),
        }
    }
}

/// A favorited movie. Serialized flat: the movie fields plus `addedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn new(movie: MovieSummary) -> Self {
        Self {
            movie,
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.movie.id
    }
}

/// Poster dimensions used when generating placeholder art.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    /// Search result grid.
    Card,
    /// Details view.
    Full,
}

impl PosterSize {
    fn dimensions(self) -> &'static str {
        match self {
            PosterSize::Card => "300x450",
            PosterSize::Full => "400x600",
        }
    }
}

pub fn is_missing_poster(poster_url: &str) -> bool {
    poster_url.is_empty() || poster_url == NOT_AVAILABLE
}

/// Deterministic placeholder image carrying the title as its caption.
pub fn placeholder_poster(title: &str, size: PosterSize) -> String {
    format!(
        "{}/{}/{}?text={}",
        PLACEHOLDER_BASE,
        size.dimensions(),
        PLACEHOLDER_COLORS,
        urlencoding::encode(title)
    )
}

/// Replaces a missing or "N/A" poster with a placeholder, leaving real URLs untouched.
pub fn normalize_poster(poster_url: &mut String, title: &str, size: PosterSize) {
    if is_missing_poster(poster_url) {
        *poster_url = placeholder_poster(title, size);
    }
}

pub fn total_pages(total_results: u32) -> u32 {
    total_results.div_ceil(PAGE_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

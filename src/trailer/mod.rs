//! Trailer lookup: video search API, then a curated table, then a search link.

use crate::config::YoutubeConfig;
use crate::http::HttpClient;
use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use url::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const EMBED_PARAMS: &str = "autoplay=0&controls=1&showinfo=0&rel=0";
const SEARCH_RESULTS_BASE: &str = "https://www.youtube.com/results?search_query=";

/// Known trailers, matched case-insensitively as substrings of the title.
const KNOWN_TRAILERS: &[(&str, &str)] = &[
    ("The Dark Knight", "6ZfuNTqbHE8"),
    ("Inception", "YoHD9XEInc0"),
    ("Interstellar", "zSWdZVtXT7E"),
    ("The Matrix", "vKQi3bIA1Bc"),
    ("Avatar", "5PSNL1qE6VY"),
    ("Avengers", "eOrNdBpGMv8"),
    ("Iron Man", "8ugaeA-nMTc"),
    ("Spider-Man", "t06RUxPbp_c"),
    ("Batman", "Cj62x_UWDFA"),
    ("Superman", "T6DJcgm3wNY"),
];

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: VideoId,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// Where a resolved trailer URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerSource {
    VideoSearch,
    KnownTitle,
    SearchLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    pub url: String,
    pub source: TrailerSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailerState {
    pub trailer: Option<Trailer>,
    pub is_loading: bool,
}

/// Thin client for the video search endpoint.
#[derive(Debug, Clone)]
pub struct VideoSearchClient {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

impl VideoSearchClient {
    pub fn new(http: HttpClient, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid video search URL: {base_url}"))?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Returns the id of the most relevant video, if any.
    #[instrument(skip(self))]
    pub async fn first_video_id(&self, query: &str) -> Result<Option<String>> {
        let params = [
            ("key", self.api_key.as_str()),
            ("q", query),
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", "1"),
            ("order", "relevance"),
            ("videoDefinition", "high"),
        ];
        let response: VideoSearchResponse = self
            .http
            .get_json_with_query(self.base_url.as_str(), &params)
            .await?;

        Ok(response
            .items
            .into_iter()
            .find_map(|item| item.id.video_id)
            .filter(|id| !id.trim().is_empty()))
    }
}

#[derive(Debug)]
pub struct TrailerResolver {
    videos: Option<VideoSearchClient>,
    state: watch::Sender<TrailerState>,
}

impl TrailerResolver {
    /// Without a video search client the resolver goes straight to the fallbacks.
    pub fn new(videos: Option<VideoSearchClient>) -> Self {
        let (state, _) = watch::channel(TrailerState::default());
        Self { videos, state }
    }

    pub fn from_config(http: HttpClient, config: &YoutubeConfig) -> Result<Self> {
        let videos = match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => Some(VideoSearchClient::new(http, &config.base_url, key)?),
            None => {
                debug!("No video search key configured; trailers use fallbacks only");
                None
            }
        };
        Ok(Self::new(videos))
    }

    pub fn state(&self) -> TrailerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrailerState> {
        self.state.subscribe()
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.state.borrow().trailer.as_ref().map(|t| t.url.clone())
    }

    /// Always ends with some URL: an embeddable video or a search link.
    #[instrument(skip(self))]
    pub async fn resolve_trailer(&self, title: &str, year: &str) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.trailer = None;
        });

        let trailer = self.lookup(title, year).await;
        info!("Trailer for '{}': {} ({:?})", title, trailer.url, trailer.source);

        self.state.send_modify(|state| {
            state.trailer = Some(trailer);
            state.is_loading = false;
        });
    }

    pub fn clear(&self) {
        self.state.send_modify(|state| state.trailer = None);
    }

    async fn lookup(&self, title: &str, year: &str) -> Trailer {
        if let Some(videos) = &self.videos {
            let query = join_query(&[title, year, "official trailer"]);
            match videos.first_video_id(&query).await {
                Ok(Some(id)) => {
                    return Trailer {
                        url: embed_url(&id),
                        source: TrailerSource::VideoSearch,
                    }
                }
                Ok(None) => debug!("Video search found nothing for '{}'", query),
                Err(e) => warn!("Video search failed, using fallbacks: {:#}", e),
            }
        }

        if let Some(id) = known_trailer(title) {
            return Trailer {
                url: embed_url(id),
                source: TrailerSource::KnownTitle,
            };
        }

        Trailer {
            url: search_link(title, year),
            source: TrailerSource::SearchLink,
        }
    }
}

/// Looks `title` up in the curated table. When several keys match, the
/// longest one wins; equal lengths fall back to table order.
pub fn known_trailer(title: &str) -> Option<&'static str> {
    let title = title.to_lowercase();
    let mut best: Option<(&str, &'static str)> = None;
    for &(key, id) in KNOWN_TRAILERS {
        if !title.contains(&key.to_lowercase()) {
            continue;
        }
        if best.map_or(true, |(current, _)| key.len() > current.len()) {
            best = Some((key, id));
        }
    }
    best.map(|(_, id)| id)
}

pub fn embed_url(video_id: &str) -> String {
    format!("{EMBED_BASE}{video_id}?{EMBED_PARAMS}")
}

pub fn search_link(title: &str, year: &str) -> String {
    let query = join_query(&[title, year, "trailer"]);
    format!("{SEARCH_RESULTS_BASE}{}", urlencoding::encode(&query))
}

fn join_query(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

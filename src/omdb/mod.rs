use crate::config::OmdbConfig;
use crate::http::HttpClient;
use crate::models::{MovieDetails, MovieSummary};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

/// `Response` value the upstream uses for a usable result.
const RESPONSE_OK: &str = "True";

#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<MovieSummary>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    #[serde(rename = "Response", default)]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn is_success(&self) -> bool {
        self.response == RESPONSE_OK
    }

    /// Upstream sends the count as a string; anything unparsable counts as zero.
    pub fn total_results(&self) -> u32 {
        self.total_results
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsResponse {
    #[serde(flatten)]
    pub details: MovieDetails,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl DetailsResponse {
    pub fn is_success(&self) -> bool {
        self.details.response == RESPONSE_OK
    }
}

impl OmdbClient {
    pub fn new(http: HttpClient, config: &OmdbConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid OMDb base URL: {}", config.base_url))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchResponse> {
        debug!("Searching OMDb");
        let page = page.to_string();
        let params = [
            ("apikey", self.api_key.as_str()),
            ("s", query),
            ("page", page.as_str()),
            ("type", "movie"),
        ];

        self.http
            .get_json_with_query(self.base_url.as_str(), &params)
            .await
    }

    #[instrument(skip(self))]
    pub async fn details(&self, id: &str) -> Result<DetailsResponse> {
        debug!("Fetching OMDb details");
        let params = [("apikey", self.api_key.as_str()), ("i", id), ("plot", "full")];

        self.http
            .get_json_with_query(self.base_url.as_str(), &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> OmdbClient {
        let config = OmdbConfig {
            base_url: format!("{}/", server.uri()),
            api_key: "test-key".into(),
        };
        OmdbClient::new(HttpClient::new().unwrap(), &config).unwrap()
    }

    #[test]
    fn total_results_parse_failures_are_zero() {
        let mut response = SearchResponse::default();
        assert_eq!(response.total_results(), 0);

        response.total_results = Some("many".into());
        assert_eq!(response.total_results(), 0);

        response.total_results = Some("412".into());
        assert_eq!(response.total_results(), 412);
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = OmdbConfig {
            base_url: "not a url".into(),
            api_key: "k".into(),
        };
        assert!(OmdbClient::new(HttpClient::new().unwrap(), &config).is_err());
    }

    #[tokio::test]
    async fn search_sends_expected_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("s", "alien"))
            .and(query_param("page", "3"))
            .and(query_param("type", "movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Search": [{
                    "imdbID": "tt0078748",
                    "Title": "Alien",
                    "Year": "1979",
                    "Poster": "N/A",
                    "Type": "movie"
                }],
                "totalResults": "31",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).await.search("alien", 3).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.total_results(), 31);
        assert_eq!(response.search[0].poster_url, "N/A");
    }

    #[tokio::test]
    async fn details_sends_expected_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("i", "tt0078748"))
            .and(query_param("plot", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "imdbID": "tt0078748",
                "Title": "Alien",
                "Director": "Ridley Scott",
                "BoxOffice": "$81,900,459",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).await.details("tt0078748").await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.details.director, "Ridley Scott");
        assert_eq!(response.details.box_office.as_deref(), Some("$81,900,459"));
    }

    #[tokio::test]
    async fn domain_failure_carries_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": "False",
                "Error": "Incorrect IMDb ID."
            })))
            .mount(&server)
            .await;

        let response = client_for(&server).await.details("bogus").await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.error.as_deref(), Some("Incorrect IMDb ID."));
    }
}

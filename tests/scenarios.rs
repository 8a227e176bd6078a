use movie_explorer::config::{OmdbConfig, YoutubeConfig};
use movie_explorer::details::{MovieDetailsLoader, DETAILS_FAILED_MESSAGE};
use movie_explorer::favorites::Favorites;
use movie_explorer::http::HttpClient;
use movie_explorer::omdb::OmdbClient;
use movie_explorer::search::MovieSearch;
use movie_explorer::storage::FileStore;
use movie_explorer::trailer::TrailerResolver;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn omdb_at(uri: &str) -> OmdbClient {
    let config = OmdbConfig {
        base_url: format!("{uri}/"),
        api_key: "scenario-key".into(),
    };
    OmdbClient::new(HttpClient::new().unwrap(), &config).unwrap()
}

#[tokio::test]
async fn batman_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "batman"))
        .and(query_param("page", "1"))
        .and(query_param("type", "movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Search": [
                {"imdbID": "tt0372784", "Title": "Batman Begins", "Year": "2005",
                 "Poster": "https://m.media-amazon.com/images/M/begins.jpg", "Type": "movie"},
                {"imdbID": "tt0096895", "Title": "Batman", "Year": "1989",
                 "Poster": "N/A", "Type": "movie"}
            ],
            "totalResults": "57",
            "Response": "True"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let search = MovieSearch::new(omdb_at(&server.uri()));

    search.search("batman", 1).await;

    let state = search.state();
    assert_eq!(state.results.len(), 2);
    assert_eq!(search.total_pages(), 6);
    assert!(!state.has_error);
    assert!(!state.is_loading);
    assert!(!state.results[1].poster_url.is_empty());
    assert_ne!(state.results[1].poster_url, "N/A");
}

#[tokio::test]
async fn nonexistent_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Movie not found!"
        })))
        .mount(&server)
        .await;
    let search = MovieSearch::new(omdb_at(&server.uri()));

    search.search("zzzznonexistent", 1).await;

    let state = search.state();
    assert!(state.results.is_empty());
    assert!(state.has_error);
    assert_eq!(state.error_message, "Movie not found!");
}

#[tokio::test]
async fn details_network_failure() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let loader = MovieDetailsLoader::new(omdb_at(&uri));

    loader.fetch_details("tt0000000").await;

    let state = loader.state();
    assert!(state.details.is_none());
    assert!(state.has_error);
    assert_eq!(state.error_message, DETAILS_FAILED_MESSAGE);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn trailer_always_resolves_even_when_every_upstream_is_down() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let config = YoutubeConfig {
        base_url: uri,
        api_key: Some("yt".into()),
    };
    let resolver = TrailerResolver::from_config(HttpClient::new().unwrap(), &config).unwrap();

    resolver.resolve_trailer("Obscure Festival Short", "2003").await;

    let state = resolver.state();
    assert!(!state.is_loading);
    assert_eq!(
        resolver.trailer_url().as_deref(),
        Some("https://www.youtube.com/results?search_query=Obscure%20Festival%20Short%202003%20trailer")
    );
}

#[tokio::test]
async fn favorite_from_search_survives_restart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Search": [{"imdbID": "tt0113277", "Title": "Heat", "Year": "1995",
                        "Poster": "N/A", "Type": "movie"}],
            "totalResults": "1",
            "Response": "True"
        })))
        .mount(&server)
        .await;
    let search = MovieSearch::new(omdb_at(&server.uri()));
    search.search("heat", 1).await;
    let heat = search.state().results[0].clone();
    let dir = tempfile::tempdir().unwrap();

    {
        let mut favorites = Favorites::new(FileStore::new(dir.path()));
        favorites.toggle(&heat);
    }
    let favorites = Favorites::new(FileStore::new(dir.path()));

    assert!(favorites.is_favorite("tt0113277"));
    assert_eq!(favorites.entries()[0].movie, heat);
}

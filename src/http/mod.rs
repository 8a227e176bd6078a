use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

const USER_AGENT: &str = concat!("movie-explorer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET with URL-encoded query parameters, decoding the body as JSON.
    ///
    /// Query values are skipped from the span since they carry API keys.
    #[instrument(skip(self, query), fields(url = %url))]
    pub async fn get_json_with_query<T, Q>(&self, url: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("Making GET request with query");
        let response = self.client.get(url).query(query).send().await?;
        let response = check_status(response)?;
        let json = response
            .json::<T>()
            .await
            .context("failed to decode JSON response")?;
        Ok(json)
    }
}

fn check_status(response: Response) -> Result<Response> {
    if !response.status().is_success() {
        error!("HTTP request failed with status: {}", response.status());
        return Err(anyhow::anyhow!("HTTP request failed: {}", response.status()));
    }
    Ok(response)
}

//! HTTP document retrieval

use std::result;

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::FetchError;

/// A response body read to completion
///
/// The underlying connection is released before this value is handed out, so
/// the caller owns plain bytes and nothing needs closing on any exit path.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    url: Url,
    body: Vec<u8>,
}

impl FetchedDocument {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Issues GET requests and validates the response status
///
/// Holds no per-request state; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct DocumentFetcher {
    client: Client,
    api_params: Vec<(String, String)>,
}

impl DocumentFetcher {
    /// Build a fetcher with the timeout and User-Agent from `config`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> result::Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Use an existing reqwest client, keeping its own timeout and headers
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_params: config.build_api_params(),
        }
    }

    /// GET `url` and return the full body of a 200 response
    ///
    /// Etiquette parameters (`tool`, `email`) from the configuration are
    /// appended unless the URL already carries them.
    ///
    /// # Errors
    ///
    /// * `FetchError::Transport` - connection, DNS, timeout, or body read failure
    /// * `FetchError::UnexpectedStatus` - any status other than 200
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> result::Result<FetchedDocument, FetchError> {
        let url = self.with_api_params(url);

        debug!("Making API request");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "API request failed");
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?.to_vec();
        debug!(bytes = body.len(), "Received response body");

        Ok(FetchedDocument { url, body })
    }

    fn with_api_params(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let missing: Vec<&(String, String)> = self
            .api_params
            .iter()
            .filter(|(key, _)| !url.query_pairs().any(|(existing, _)| existing == key.as_str()))
            .collect();

        if !missing.is_empty() {
            url.query_pairs_mut().extend_pairs(missing);
        }
        url
    }
}

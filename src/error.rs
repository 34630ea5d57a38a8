use std::fmt;
use std::result;

use thiserror::Error;

/// Failure to compose a request URL
#[derive(Error, Debug)]
pub enum UrlError {
    /// The base endpoint is not a syntactically valid URL
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failure to retrieve a document over HTTP
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response status was not 200 OK
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// The response body does not have the expected hierarchical shape
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Response body is not valid UTF-8
    #[error("Response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// XML parsing failed
    #[error("XML parsing failed: {message}")]
    Xml { message: String },

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream reported an error inside a successful response
    #[error("NCBI API error: {message}")]
    Api { message: String },

    /// A structurally required field is absent from an entry
    #[error("Missing required field '{field}' in article {pmid}")]
    MissingField { field: &'static str, pmid: String },

    /// An identifier could not be read as a positive integer
    #[error("Invalid PMID format: {value}")]
    InvalidIdentifier { value: String },
}

/// The record set could not be turned into its transmittable form
#[derive(Error, Debug)]
#[error("JSON encoding failed: {0}")]
pub struct EncodeError(#[from] pub serde_json::Error);

/// Which of the two network round-trips an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// ESearch: query to identifier list
    Search,
    /// EFetch: identifier list to article records
    Fetch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Search => f.write_str("identifier resolution"),
            Stage::Fetch => f.write_str("record fetch"),
        }
    }
}

/// Error types for the retrieval pipeline
#[derive(Error, Debug)]
pub enum PubMedError {
    /// Request URL could not be built
    #[error("{stage} failed to build request: {source}")]
    QueryBuild {
        stage: Stage,
        #[source]
        source: UrlError,
    },

    /// Document could not be retrieved
    #[error("{stage} failed to fetch document: {source}")]
    Fetch {
        stage: Stage,
        #[source]
        source: FetchError,
    },

    /// Document could not be decoded
    #[error("{stage} failed to decode response: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: DecodeError,
    },

    /// Record set could not be serialized
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Search limit exceeded
    /// This error is returned when a search query requests more results than the maximum retrievable limit.
    #[error("Search limit exceeded: requested {requested}, maximum is {maximum}")]
    SearchLimitExceeded { requested: usize, maximum: usize },
}

impl PubMedError {
    /// The pipeline stage that failed, if the error came from a network round-trip
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PubMedError::QueryBuild { stage, .. }
            | PubMedError::Fetch { stage, .. }
            | PubMedError::Decode { stage, .. } => Some(*stage),
            PubMedError::Encode(_) | PubMedError::SearchLimitExceeded { .. } => None,
        }
    }

    /// The HTTP status carried by an `UnexpectedStatus` failure
    pub fn status(&self) -> Option<u16> {
        match self {
            PubMedError::Fetch {
                source: FetchError::UnexpectedStatus { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same call might succeed
    ///
    /// The pipeline never retries on its own; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            PubMedError::Fetch { source, .. } => match source {
                FetchError::Transport(err) => {
                    err.is_timeout() || err.is_connect() || err.is_request()
                }
                FetchError::UnexpectedStatus { status, .. } => {
                    (500..600).contains(status) || *status == 429
                }
            },
            _ => false,
        }
    }
}

pub type Result<T> = result::Result<T, PubMedError>;

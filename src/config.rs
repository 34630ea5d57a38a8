//! Client configuration
//!
//! Endpoints are injected here instead of being compiled in, so tests can point
//! the pipeline at a local mock server.

use std::time::Duration;

use crate::pubmed::parser::EntryPolicy;

/// Default ESearch endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

/// Default EFetch endpoint
pub const DEFAULT_FETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Number of identifiers requested per search when the caller does not say otherwise
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Field name used for the record identifier in serialized output
pub const DEFAULT_IDENTIFIER_KEY: &str = "pmid";

/// Configuration for [`PubMedClient`](crate::PubMedClient)
///
/// # Example
///
/// ```
/// use pubmed_retrieve::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_max_results(25)
///     .with_timeout(Duration::from_secs(10))
///     .with_email("researcher@university.edu");
///
/// assert_eq!(config.max_results, 25);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// ESearch endpoint
    pub search_url: String,
    /// EFetch endpoint
    pub fetch_url: String,
    /// Identifier cap sent as `retmax`
    pub max_results: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Custom User-Agent header
    pub user_agent: Option<String>,
    /// Tool name sent to NCBI
    pub tool: Option<String>,
    /// Contact email sent to NCBI
    pub email: Option<String>,
    /// How malformed entries in a fetch response are handled
    pub entry_policy: EntryPolicy,
    /// Field name for the identifier in serialized output
    pub identifier_key: String,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            fetch_url: DEFAULT_FETCH_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_secs(30),
            user_agent: None,
            tool: None,
            email: None,
            entry_policy: EntryPolicy::default(),
            identifier_key: DEFAULT_IDENTIFIER_KEY.to_string(),
        }
    }

    pub fn with_search_url<S: Into<String>>(mut self, url: S) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn with_fetch_url<S: Into<String>>(mut self, url: S) -> Self {
        self.fetch_url = url.into();
        self
    }

    /// Point both endpoints at `<base>/esearch.fcgi` and `<base>/efetch.fcgi`
    ///
    /// ```
    /// use pubmed_retrieve::ClientConfig;
    ///
    /// let config = ClientConfig::new().with_base_url("http://127.0.0.1:8080/");
    /// assert_eq!(config.search_url, "http://127.0.0.1:8080/esearch.fcgi");
    /// assert_eq!(config.fetch_url, "http://127.0.0.1:8080/efetch.fcgi");
    /// ```
    pub fn with_base_url<S: AsRef<str>>(mut self, base_url: S) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        self.search_url = format!("{base}/esearch.fcgi");
        self.fetch_url = format!("{base}/efetch.fcgi");
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_entry_policy(mut self, policy: EntryPolicy) -> Self {
        self.entry_policy = policy;
        self
    }

    pub fn with_identifier_key<S: Into<String>>(mut self, key: S) -> Self {
        self.identifier_key = key.into();
        self
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("pubmed-retrieve/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Etiquette parameters appended to every request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(tool) = &self.tool {
            params.push(("tool".to_string(), tool.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

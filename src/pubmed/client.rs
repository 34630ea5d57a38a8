use std::collections::BTreeMap;
use std::str;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{DecodeError, PubMedError, Result, Stage};
use crate::export::RecordSerializer;
use crate::pubmed::fetcher::{DocumentFetcher, FetchedDocument};
use crate::pubmed::models::{ArticleRecordSet, IdentifierList, SearchQuery};
use crate::pubmed::parser::{parse_articles_from_xml, parse_identifier_list};
use crate::pubmed::url::build_url;

/// PubMed limits: retstart cannot exceed 9998 and retmax is capped at 9999,
/// so only the first 9,999 identifiers of a search are retrievable.
pub const MAX_RETRIEVABLE: usize = 9999;

/// Client for the two-stage ESearch/EFetch pipeline
///
/// Every call is an independent request/response sequence. The client holds
/// only configuration and a connection pool, so it can be cloned and shared
/// across tasks issuing unrelated queries.
#[derive(Clone, Debug)]
pub struct PubMedClient {
    fetcher: DocumentFetcher,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_retrieve::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_retrieve::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_base_url("http://127.0.0.1:9000")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let fetcher = DocumentFetcher::new(&config).expect("Failed to create HTTP client");
        Self { fetcher, config }
    }

    /// Create a new PubMed client around an existing reqwest client
    ///
    /// The reqwest client's own timeout and headers are used; the timeout and
    /// User-Agent in `config` are ignored.
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        let fetcher = DocumentFetcher::with_client(client, &config);
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a query for `term` using the configured result cap
    pub fn query<S: Into<String>>(&self, term: S) -> SearchQuery {
        SearchQuery::new(term).with_max_results(self.config.max_results)
    }

    /// Resolve a query into PMIDs via ESearch
    ///
    /// Identifiers are returned in upstream relevance order. Zero matches is an
    /// empty list, not an error. A blank query returns an empty list without
    /// contacting the server.
    ///
    /// # Errors
    ///
    /// * `PubMedError::SearchLimitExceeded` - cap above [`MAX_RETRIEVABLE`]
    /// * `PubMedError::QueryBuild` - the search endpoint is not a valid URL
    /// * `PubMedError::Fetch` - transport failure or non-200 status
    /// * `PubMedError::Decode` - the body is not a well-formed `eSearchResult`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_retrieve::{PubMedClient, SearchQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let ids = client
    ///         .search_articles(&SearchQuery::new("cancer[majr] AND Cell[ta]"))
    ///         .await?;
    ///     println!("{} of {} matches", ids.len(), ids.total_count);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(term = %query.term(), limit = query.max_results()))]
    pub async fn search_articles(&self, query: &SearchQuery) -> Result<IdentifierList> {
        let limit = query.max_results();
        if limit > MAX_RETRIEVABLE {
            return Err(PubMedError::SearchLimitExceeded {
                requested: limit,
                maximum: MAX_RETRIEVABLE,
            });
        }

        if query.term().trim().is_empty() {
            debug!("Empty query provided, returning empty results");
            return Ok(IdentifierList::default());
        }

        let params = BTreeMap::from([
            ("db".to_string(), SearchQuery::DATABASE.to_string()),
            ("term".to_string(), query.term().to_string()),
            ("retmax".to_string(), limit.to_string()),
        ]);

        let document = self.get(Stage::Search, &self.config.search_url, &params).await?;
        let ids = decode_with(Stage::Search, &document, parse_identifier_list)?;

        let expected = usize::try_from(ids.total_count)
            .unwrap_or(usize::MAX)
            .min(limit);
        if ids.len() != expected {
            warn!(
                total_count = ids.total_count,
                returned = ids.len(),
                expected,
                "Identifier count does not match reported Count"
            );
        }

        info!(
            total_count = ids.total_count,
            returned = ids.len(),
            "Search completed successfully"
        );
        Ok(ids)
    }

    /// Fetch and decode full records for `ids` via a single EFetch request
    ///
    /// An empty list returns an empty set without contacting the server.
    /// Records upstream does not return are absent from the result; entries
    /// that fail to decode follow the configured
    /// [`EntryPolicy`](crate::pubmed::parser::EntryPolicy).
    ///
    /// # Errors
    ///
    /// Same kinds as [`search_articles`](Self::search_articles), tagged with
    /// [`Stage::Fetch`].
    #[instrument(skip(self, ids), fields(ids_count = ids.len()))]
    pub async fn fetch_articles(&self, ids: &IdentifierList) -> Result<ArticleRecordSet> {
        if ids.is_empty() {
            return Ok(ArticleRecordSet::default());
        }

        let params = BTreeMap::from([
            ("db".to_string(), SearchQuery::DATABASE.to_string()),
            ("id".to_string(), ids.joined()),
            ("retmode".to_string(), "xml".to_string()),
        ]);

        let document = self.get(Stage::Fetch, &self.config.fetch_url, &params).await?;
        let policy = self.config.entry_policy;
        let articles = decode_with(Stage::Fetch, &document, |xml| {
            parse_articles_from_xml(xml, policy)
        })?;

        if articles.len() < ids.len() {
            debug!(
                requested = ids.len(),
                parsed = articles.len(),
                "Upstream returned fewer records than requested"
            );
        }
        info!(
            requested = ids.len(),
            parsed = articles.len(),
            "Fetch completed"
        );
        Ok(ArticleRecordSet::new(articles))
    }

    /// Resolve `query` and fetch the matching records
    ///
    /// The fetch depends on the search result, so the two requests are strictly
    /// sequential. Either the whole set is returned or the call fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_retrieve::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let records = client.search_and_fetch(&client.query("covid-19")).await?;
    ///     for record in records.iter() {
    ///         println!("{}: {}", record.pmid, record.journal);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn search_and_fetch(&self, query: &SearchQuery) -> Result<ArticleRecordSet> {
        let ids = self.search_articles(query).await?;
        self.fetch_articles(&ids).await
    }

    /// Run the full pipeline and serialize the result with the configured
    /// identifier key
    pub async fn retrieve_json(&self, query: &SearchQuery) -> Result<Vec<u8>> {
        let records = self.search_and_fetch(query).await?;
        let serializer = RecordSerializer::new().with_identifier_key(&self.config.identifier_key);
        Ok(serializer.encode(&records)?)
    }

    async fn get(
        &self,
        stage: Stage,
        endpoint: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<FetchedDocument> {
        let url = build_url(endpoint, params)
            .map_err(|source| PubMedError::QueryBuild { stage, source })?;

        debug!(%stage, "Making API request");
        self.fetcher
            .fetch(&url)
            .await
            .map_err(|source| PubMedError::Fetch { stage, source })
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_with<T>(
    stage: Stage,
    document: &FetchedDocument,
    decode: impl FnOnce(&str) -> std::result::Result<T, DecodeError>,
) -> Result<T> {
    str::from_utf8(document.bytes())
        .map_err(DecodeError::from)
        .and_then(decode)
        .map_err(|source| PubMedError::Decode { stage, source })
}

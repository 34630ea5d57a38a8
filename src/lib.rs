//! # PubMed Retrieve
//!
//! Resolves a free-text PubMed query into article identifiers and fetches the
//! full records for them through the NCBI E-utilities API.
//!
//! ## Pipeline
//!
//! 1. **ESearch** turns the query into an ordered [`IdentifierList`].
//! 2. **EFetch** turns that list into an [`ArticleRecordSet`], decoded from
//!    `PubmedArticleSet` XML into flat records.
//! 3. [`RecordSerializer`] turns the record set into JSON bytes.
//!
//! The second request depends on the first, so they always run in sequence.
//! Nothing is cached and nothing is retried; each call is independent.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_retrieve::{PubMedClient, RecordSerializer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new();
//!     let query = client.query("cancer[majr] AND Cell[ta]");
//!
//!     let records = client.search_and_fetch(&query).await?;
//!     for record in records.iter() {
//!         println!("{} ({}): {} authors", record.pmid, record.journal, record.authors.len());
//!     }
//!
//!     let json = RecordSerializer::new().pretty(true).encode(&records)?;
//!     println!("{}", String::from_utf8_lossy(&json));
//!     Ok(())
//! }
//! ```
//!
//! ## Testing against a mock server
//!
//! Both endpoints come from [`ClientConfig`], so tests can point the client at a
//! local server:
//!
//! ```
//! use pubmed_retrieve::{ClientConfig, PubMedClient};
//!
//! let client = PubMedClient::with_config(
//!     ClientConfig::new().with_base_url("http://127.0.0.1:8080"),
//! );
//! assert_eq!(client.config().search_url, "http://127.0.0.1:8080/esearch.fcgi");
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod pubmed;

// Re-export main types for convenience
pub use common::PubMedId;
pub use config::ClientConfig;
pub use error::{DecodeError, EncodeError, FetchError, PubMedError, Result, Stage, UrlError};
pub use export::RecordSerializer;
pub use pubmed::{
    ArticleRecord, ArticleRecordSet, Author, EntryPolicy, IdentifierList, PubDate, PubMedClient,
    SearchQuery,
};

//! PubMed client for searching and fetching article metadata
//!
//! The pipeline is split across focused modules:
//! - `url` - request URL construction
//! - `fetcher` - HTTP GET with status validation
//! - `parser` - ESearch and EFetch XML decoding
//! - `client` - the search-then-fetch sequence

pub mod client;
pub mod fetcher;
pub mod models;
pub mod parser;
pub(crate) mod responses;
pub mod url;

// Re-export public types
pub use client::{MAX_RETRIEVABLE, PubMedClient};
pub use fetcher::{DocumentFetcher, FetchedDocument};
pub use models::{ArticleRecord, ArticleRecordSet, Author, IdentifierList, PubDate, SearchQuery};
pub use parser::{EntryPolicy, parse_articles_from_xml, parse_identifier_list};

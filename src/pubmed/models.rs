use serde::{Deserialize, Serialize};

use crate::common::PubMedId;
use crate::config::DEFAULT_MAX_RESULTS;

/// A free-text PubMed query with its result cap
///
/// The query text is passed through to ESearch untouched.
///
/// # Example
///
/// ```
/// use pubmed_retrieve::SearchQuery;
///
/// let query = SearchQuery::new("cancer[majr] AND Cell[ta]").with_max_results(5);
/// assert_eq!(query.term(), "cancer[majr] AND Cell[ta]");
/// assert_eq!(query.max_results(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    max_results: usize,
}

impl SearchQuery {
    /// Database every request targets
    pub const DATABASE: &'static str = "pubmed";

    pub fn new<S: Into<String>>(term: S) -> Self {
        Self {
            term: term.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

/// Identifiers returned by ESearch, in upstream relevance order
///
/// Duplicates are kept if upstream sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierList {
    /// Total number of matches upstream reports (`Count`), regardless of the cap
    pub total_count: u64,
    /// Returned identifiers
    pub ids: Vec<PubMedId>,
}

impl IdentifierList {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PubMedId> {
        self.ids.iter()
    }

    /// Comma-joined form used for the EFetch `id` parameter
    pub fn joined(&self) -> String {
        self.ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl IntoIterator for IdentifierList {
    type Item = PubMedId;
    type IntoIter = std::vec::IntoIter<PubMedId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

/// Publication date; a zero month or day means the field was absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubDate {
    pub year: u16,
    #[serde(default)]
    pub month: u8,
    #[serde(default)]
    pub day: u8,
}

/// One author entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub last_name: String,
    /// Empty when upstream has no `ForeName`
    #[serde(default)]
    pub fore_name: String,
    /// Empty when upstream has no `AffiliationInfo`
    #[serde(default)]
    pub affiliation: String,
}

/// One bibliographic record decoded from EFetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub pmid: PubMedId,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub r#abstract: String,
    pub pub_date: PubDate,
    #[serde(default)]
    pub authors: Vec<Author>,
}

/// Records decoded from one EFetch response, in response order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleRecordSet {
    pub articles: Vec<ArticleRecord>,
}

impl ArticleRecordSet {
    pub fn new(articles: Vec<ArticleRecord>) -> Self {
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArticleRecord> {
        self.articles.iter()
    }
}

impl IntoIterator for ArticleRecordSet {
    type Item = ArticleRecord;
    type IntoIter = std::vec::IntoIter<ArticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.into_iter()
    }
}

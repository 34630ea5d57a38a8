//! EFetch XML schema
//!
//! One set of types for the `PubmedArticleSet` document. Each field below is the
//! single source for one path-to-field mapping:
//!
//! | Record field        | XML path (under `PubmedArticle`)                              |
//! |---------------------|---------------------------------------------------------------|
//! | `pmid`              | `MedlineCitation/PMID`                                        |
//! | `journal`           | `MedlineCitation/Article/Journal/Title`                       |
//! | `abstract`          | `MedlineCitation/Article/Abstract/AbstractText` (all, joined) |
//! | `pub_date`          | `MedlineCitation/Article/Journal/JournalIssue/PubDate`        |
//! | `authors`           | `MedlineCitation/Article/AuthorList/Author`                   |
//! | `author.affiliation`| `Author/AffiliationInfo/Affiliation` (first)                  |

use serde::Deserialize;

use super::deserializers::{AbstractText, TextElement};
use crate::common::PubMedId;
use crate::error::DecodeError;
use crate::pubmed::models::{ArticleRecord, Author, PubDate};

#[derive(Debug, Deserialize)]
pub(super) struct PubmedArticleSet {
    #[serde(rename = "PubmedArticle", default)]
    pub articles: Vec<PubmedArticle>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PubmedArticle {
    #[serde(rename = "MedlineCitation")]
    pub medline_citation: Option<MedlineCitation>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MedlineCitation {
    #[serde(rename = "PMID")]
    pub pmid: Option<TextElement>,
    #[serde(rename = "Article")]
    pub article: Option<Article>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Article {
    #[serde(rename = "Journal")]
    pub journal: Option<Journal>,
    #[serde(rename = "Abstract")]
    pub abstract_: Option<Abstract>,
    #[serde(rename = "AuthorList")]
    pub author_list: Option<AuthorList>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Journal {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "JournalIssue")]
    pub journal_issue: Option<JournalIssue>,
}

#[derive(Debug, Deserialize)]
pub(super) struct JournalIssue {
    #[serde(rename = "PubDate")]
    pub pub_date: Option<PubDateXml>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PubDateXml {
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Month")]
    pub month: Option<String>,
    #[serde(rename = "Day")]
    pub day: Option<String>,
    #[serde(rename = "MedlineDate")]
    pub medline_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Abstract {
    #[serde(rename = "AbstractText", default)]
    pub texts: Vec<AbstractText>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthorList {
    #[serde(rename = "Author", default)]
    pub authors: Vec<AuthorXml>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthorXml {
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
    #[serde(rename = "ForeName")]
    pub fore_name: Option<String>,
    #[serde(rename = "AffiliationInfo", default)]
    pub affiliation_info: Vec<AffiliationInfo>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AffiliationInfo {
    #[serde(rename = "Affiliation")]
    pub affiliation: Option<String>,
}

impl PubmedArticle {
    /// Raw PMID text, for log messages about entries that fail conversion
    pub fn raw_pmid(&self) -> Option<&str> {
        self.medline_citation
            .as_ref()
            .and_then(|citation| citation.pmid.as_ref())
            .map(|p| p.value.trim())
            .filter(|p| !p.is_empty())
    }

    pub fn into_record(self) -> Result<ArticleRecord, DecodeError> {
        let raw_pmid = self
            .raw_pmid()
            .ok_or_else(|| DecodeError::MissingField {
                field: "PMID",
                pmid: "<unknown>".to_string(),
            })?
            .to_string();
        let pmid = PubMedId::parse(&raw_pmid)?;

        let article = self.medline_citation.and_then(|citation| citation.article);
        let (journal, abstract_, author_list) = match article {
            Some(a) => (a.journal, a.abstract_, a.author_list),
            None => (None, None, None),
        };

        let (journal_title, pub_date) = match journal {
            Some(j) => (
                j.title.unwrap_or_default(),
                j.journal_issue.and_then(|issue| issue.pub_date),
            ),
            None => (String::new(), None),
        };

        let abstract_text = abstract_
            .map(|a| {
                a.texts
                    .iter()
                    .map(|t| t.text.trim())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let authors = author_list
            .map(|list| list.authors)
            .unwrap_or_default()
            .into_iter()
            .map(|author| author.into_author(&raw_pmid))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArticleRecord {
            pmid,
            journal: journal_title.trim().to_string(),
            r#abstract: abstract_text,
            pub_date: pub_date.unwrap_or_default().into_pub_date(),
            authors,
        })
    }
}

impl AuthorXml {
    fn into_author(self, pmid: &str) -> Result<Author, DecodeError> {
        let last_name = self
            .last_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DecodeError::MissingField {
                field: "LastName",
                pmid: pmid.to_string(),
            })?;

        let affiliation = self
            .affiliation_info
            .into_iter()
            .find_map(|info| info.affiliation)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        Ok(Author {
            last_name,
            fore_name: self.fore_name.map(|s| s.trim().to_string()).unwrap_or_default(),
            affiliation,
        })
    }
}

impl PubDateXml {
    fn into_pub_date(self) -> PubDate {
        let year = self
            .year
            .as_deref()
            .and_then(|y| y.trim().parse::<u16>().ok())
            .or_else(|| self.medline_date.as_deref().and_then(year_from_medline_date))
            .unwrap_or(0);

        PubDate {
            year,
            month: self.month.as_deref().map(parse_month).unwrap_or(0),
            day: self
                .day
                .as_deref()
                .and_then(|d| d.trim().parse::<u8>().ok())
                .filter(|d| (1..=31).contains(d))
                .unwrap_or(0),
        }
    }
}

/// First four-digit run in a free-form date such as `"1998 Dec-1999 Jan"`
fn year_from_medline_date(text: &str) -> Option<u16> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 4)
        .and_then(|part| part.parse().ok())
}

/// Month as 1-12; numeric or English names, anything else is 0
fn parse_month(text: &str) -> u8 {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];

    let text = text.trim();
    if let Ok(n) = text.parse::<u8>() {
        return if (1..=12).contains(&n) { n } else { 0 };
    }

    let lower = text.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| lower.starts_with(m))
        .map(|i| i as u8 + 1)
        .unwrap_or(0)
}

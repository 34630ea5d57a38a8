//! PubMed XML decoding
//!
//! Turns ESearch and EFetch response bodies into [`IdentifierList`] and
//! [`ArticleRecord`] values.
//!
//! # Module Organization
//!
//! - `preprocessing` - inline markup removal before deserialization
//! - `deserializers` - serde helpers for mixed-content elements
//! - `xml_types` - the EFetch document schema and its mapping to records

mod deserializers;
mod preprocessing;
mod xml_types;

use std::result;

use quick_xml::Reader;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use tracing::{debug, instrument, warn};

use crate::common::PubMedId;
use crate::error::DecodeError;
use crate::pubmed::models::{ArticleRecord, IdentifierList};
use crate::pubmed::responses::ESearchResult;
use preprocessing::strip_inline_html_tags;
use xml_types::PubmedArticleSet;

/// What to do with an EFetch entry whose required fields are missing or invalid
///
/// Required fields are the PMID and each author's `LastName`. Optional fields
/// never cause an entry to be rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryPolicy {
    /// Drop the entry, log a warning, keep decoding the rest
    #[default]
    SkipMalformed,
    /// Fail the whole response with the entry's error
    Strict,
}

/// Decode an ESearch XML response into identifiers in response order
///
/// An empty `IdList` is a valid zero-match result.
///
/// # Errors
///
/// * `DecodeError::Xml` - not an `eSearchResult` document, or `Count` is missing
/// * `DecodeError::Api` - the document carries an `ERROR` element
/// * `DecodeError::InvalidIdentifier` - an `Id` is not a positive integer
///
/// # Example
///
/// ```
/// use pubmed_retrieve::pubmed::parser::parse_identifier_list;
///
/// let xml = r#"<eSearchResult><Count>2</Count><IdList><Id>31978945</Id><Id>33515491</Id></IdList></eSearchResult>"#;
/// let ids = parse_identifier_list(xml).unwrap();
/// assert_eq!(ids.total_count, 2);
/// assert_eq!(ids.joined(), "31978945,33515491");
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_identifier_list(xml: &str) -> result::Result<IdentifierList, DecodeError> {
    expect_root(xml, "eSearchResult")?;

    let result: ESearchResult = from_str(xml).map_err(|e| DecodeError::Xml {
        message: format!("Failed to deserialize eSearchResult: {}", e),
    })?;

    if let Some(message) = result.error {
        return Err(DecodeError::Api { message });
    }

    let count_text = result.count.ok_or_else(|| DecodeError::Xml {
        message: "eSearchResult has no Count element".to_string(),
    })?;
    let total_count = count_text
        .trim()
        .parse::<u64>()
        .map_err(|_| DecodeError::Xml {
            message: format!("Count is not a number: {}", count_text),
        })?;

    let ids = result
        .id_list
        .unwrap_or_default()
        .ids
        .iter()
        .map(|id| PubMedId::parse(id))
        .collect::<result::Result<Vec<_>, _>>()?;

    debug!(total_count, returned = ids.len(), "Decoded eSearchResult");
    Ok(IdentifierList { total_count, ids })
}

/// Decode an EFetch XML response into article records in response order
///
/// Entries are never invented: identifiers upstream omits are simply absent.
/// An empty body is an empty result.
///
/// # Errors
///
/// * `DecodeError::Xml` - not a `PubmedArticleSet` document
/// * `DecodeError::MissingField` / `DecodeError::InvalidIdentifier` - a malformed
///   entry, only under [`EntryPolicy::Strict`]
///
/// # Example
///
/// ```
/// use pubmed_retrieve::pubmed::parser::{parse_articles_from_xml, EntryPolicy};
///
/// let xml = r#"<PubmedArticleSet>
///   <PubmedArticle>
///     <MedlineCitation>
///       <PMID Version="1">12345</PMID>
///       <Article><Journal><Title>Cell</Title></Journal></Article>
///     </MedlineCitation>
///   </PubmedArticle>
/// </PubmedArticleSet>"#;
///
/// let records = parse_articles_from_xml(xml, EntryPolicy::Strict).unwrap();
/// assert_eq!(records[0].pmid.as_u32(), 12345);
/// assert_eq!(records[0].journal, "Cell");
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_articles_from_xml(
    xml: &str,
    policy: EntryPolicy,
) -> result::Result<Vec<ArticleRecord>, DecodeError> {
    if xml.trim().is_empty() {
        debug!("Empty EFetch body, no articles");
        return Ok(Vec::new());
    }

    expect_root(xml, "PubmedArticleSet")?;

    let cleaned = strip_inline_html_tags(xml);
    let article_set: PubmedArticleSet = from_str(&cleaned).map_err(|e| DecodeError::Xml {
        message: format!("Failed to deserialize PubmedArticleSet: {}", e),
    })?;

    let mut records = Vec::with_capacity(article_set.articles.len());
    for entry in article_set.articles {
        let pmid = entry.raw_pmid().unwrap_or("<unknown>").to_string();
        match entry.into_record() {
            Ok(record) => records.push(record),
            Err(e) => match policy {
                EntryPolicy::SkipMalformed => {
                    warn!(pmid = %pmid, error = %e, "Failed to decode article, skipping");
                }
                EntryPolicy::Strict => return Err(e),
            },
        }
    }

    Ok(records)
}

/// Check the document element name before deserializing
///
/// The serde deserializer accepts any root element, so an HTML error page
/// would otherwise decode as an empty result.
fn expect_root(xml: &str, expected: &str) -> result::Result<(), DecodeError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.name();
                return if name.as_ref() == expected.as_bytes() {
                    Ok(())
                } else {
                    Err(DecodeError::Xml {
                        message: format!(
                            "Expected root element <{}>, found <{}>",
                            expected,
                            String::from_utf8_lossy(name.as_ref())
                        ),
                    })
                };
            }
            Ok(Event::Eof) => {
                return Err(DecodeError::Xml {
                    message: format!("Expected root element <{}>, found no elements", expected),
                });
            }
            Ok(_) => continue,
            Err(e) => {
                return Err(DecodeError::Xml {
                    message: format!("Malformed XML: {}", e),
                });
            }
        }
    }
}

//! Validated PubMed identifiers

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::result;
use std::str::FromStr;

/// A validated PubMed ID (PMID)
///
/// PMIDs are positive integers. Upstream sends them as text in both ESearch
/// and EFetch responses; this type is what the rest of the crate passes around.
/// It serializes as a bare number.
///
/// # Examples
///
/// ```
/// use pubmed_retrieve::PubMedId;
///
/// let pmid = PubMedId::parse("  31978945  ").unwrap();
/// assert_eq!(pmid.as_u32(), 31978945);
/// assert_eq!(pmid.to_string(), "31978945");
///
/// assert!(PubMedId::parse("").is_err());
/// assert!(PubMedId::parse("abc").is_err());
/// assert!(PubMedId::parse("0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PubMedId {
    value: u32,
}

impl PubMedId {
    /// Parse a PMID from text, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidIdentifier` if the text is empty, not a
    /// decimal number, zero, or too large for a u32.
    pub fn parse(s: &str) -> result::Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidIdentifier {
            value: s.to_string(),
        };

        let value = s.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::try_from_u32(value).map_err(|_| invalid())
    }

    /// # Errors
    ///
    /// Returns `DecodeError::InvalidIdentifier` if the value is zero.
    pub fn try_from_u32(value: u32) -> result::Result<Self, DecodeError> {
        if value == 0 {
            return Err(DecodeError::InvalidIdentifier {
                value: value.to_string(),
            });
        }
        Ok(Self { value })
    }

    pub fn as_u32(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for PubMedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for PubMedId {
    type Err = DecodeError;

    fn from_str(s: &str) -> result::Result<Self, DecodeError> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for PubMedId {
    type Error = DecodeError;

    fn try_from(value: u32) -> result::Result<Self, DecodeError> {
        Self::try_from_u32(value)
    }
}

impl From<PubMedId> for u32 {
    fn from(pmid: PubMedId) -> Self {
        pmid.value
    }
}

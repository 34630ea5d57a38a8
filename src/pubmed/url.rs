//! Request URL construction

use std::collections::BTreeMap;
use std::result;

use url::Url;

use crate::error::UrlError;

/// Build a fully encoded request URL from an endpoint and query parameters
///
/// Parameters already present on the endpoint are kept unless `params` names
/// the same key, in which case the value from `params` wins. Every key appears
/// exactly once in the result, in sorted order, with values
/// `application/x-www-form-urlencoded` encoded.
///
/// # Errors
///
/// Returns `UrlError::InvalidEndpoint` if `base` is not a valid absolute URL.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use pubmed_retrieve::pubmed::url::build_url;
///
/// let mut params = BTreeMap::new();
/// params.insert("db".to_string(), "pubmed".to_string());
/// params.insert("term".to_string(), "cancer[majr] AND Cell[ta]".to_string());
///
/// let url = build_url("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi", &params).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi?db=pubmed&term=cancer%5Bmajr%5D+AND+Cell%5Bta%5D"
/// );
/// ```
pub fn build_url(base: &str, params: &BTreeMap<String, String>) -> result::Result<Url, UrlError> {
    let mut url = Url::parse(base).map_err(|source| UrlError::InvalidEndpoint {
        url: base.to_string(),
        source,
    })?;

    let mut merged: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
    merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));

    url.set_query(None);
    if !merged.is_empty() {
        url.query_pairs_mut().extend_pairs(merged.iter());
    }

    Ok(url)
}

//! XML cleanup applied before deserialization

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Remove inline formatting tags such as `<i>`, `<sup>` and `<sub>`
///
/// These appear inside `AbstractText`, `ArticleTitle` and `Affiliation`. Left in
/// place, the serde deserializer sees them as child elements and the text around
/// them is split or lost. Tags with attributes (`<sup class="x">`) are removed too.
///
/// ```ignore
/// let cleaned = strip_inline_html_tags("<AbstractText>CO<sub>2</sub> levels</AbstractText>");
/// assert_eq!(cleaned, "<AbstractText>CO2 levels</AbstractText>");
/// ```
pub(crate) fn strip_inline_html_tags(xml: &str) -> Cow<'_, str> {
    static INLINE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold|sc|underline)(?:\s[^>]*)?>")
            .expect("inline tag pattern is valid")
    });

    let cleaned = re.replace_all(xml, "");
    if cleaned.len() != xml.len() {
        debug!(
            removed_bytes = xml.len() - cleaned.len(),
            "Stripped inline formatting tags"
        );
    }
    cleaned
}

//! Custom serde deserializers for mixed-content PubMed XML fields

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::result;

/// One `AbstractText` element
///
/// Structured abstracts carry a `Label` attribute (BACKGROUND, METHODS, ...)
/// and sometimes `NlmCategory`; only the label is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct AbstractText {
    pub label: Option<String>,
    pub text: String,
}

impl<'de> Deserialize<'de> for AbstractText {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AbstractTextVisitor;

        impl<'de> Visitor<'de> for AbstractTextVisitor {
            type Value = AbstractText;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("abstract text content")
            }

            fn visit_str<E>(self, value: &str) -> result::Result<AbstractText, E>
            where
                E: de::Error,
            {
                Ok(AbstractText {
                    label: None,
                    text: value.to_string(),
                })
            }

            fn visit_string<E>(self, value: String) -> result::Result<AbstractText, E>
            where
                E: de::Error,
            {
                Ok(AbstractText {
                    label: None,
                    text: value,
                })
            }

            fn visit_unit<E>(self) -> result::Result<AbstractText, E>
            where
                E: de::Error,
            {
                Ok(AbstractText::default())
            }

            fn visit_map<M>(self, mut map: M) -> result::Result<AbstractText, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut parts = Vec::new();
                let mut label = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "$text" | "$value" => parts.push(map.next_value::<String>()?),
                        "@Label" => label = Some(map.next_value::<String>()?),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(AbstractText {
                    label,
                    text: parts.join(""),
                })
            }
        }

        deserializer.deserialize_any(AbstractTextVisitor)
    }
}

/// Element text with attributes ignored, e.g. `<PMID Version="1">12345</PMID>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(super) struct TextElement {
    #[serde(rename = "$text", default)]
    pub value: String,
}

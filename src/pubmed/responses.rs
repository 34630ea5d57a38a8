use serde::Deserialize;

/// ESearch XML response (`retmode=xml`)
#[derive(Debug, Deserialize)]
pub(crate) struct ESearchResult {
    #[serde(rename = "ERROR", default)]
    pub error: Option<String>,
    #[serde(rename = "Count", default)]
    pub count: Option<String>,
    #[serde(rename = "IdList", default)]
    pub id_list: Option<IdList>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdList {
    #[serde(rename = "Id", default)]
    pub ids: Vec<String>,
}

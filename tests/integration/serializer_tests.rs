//! JSON serializer tests over records decoded from real-shaped EFetch XML

mod common;

use pubmed_retrieve::{
    ArticleRecordSet, EntryPolicy, PubMedError, RecordSerializer, pubmed::parse_articles_from_xml,
};
use rstest::rstest;
use serde_json::Value;

use common::{EFETCH_SINGLE_MINIMAL, EFETCH_THREE_ARTICLES};

fn decode(xml: &str) -> ArticleRecordSet {
    ArticleRecordSet::new(parse_articles_from_xml(xml, EntryPolicy::default()).unwrap())
}

#[test]
fn test_minimal_record_serializes_to_documented_shape() {
    let bytes = RecordSerializer::new()
        .encode(&decode(EFETCH_SINGLE_MINIMAL))
        .unwrap();

    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "pmid": 12345,
            "journal": "Cell",
            "abstract": "...",
            "pubDate": { "year": 2020, "month": 0, "day": 0 },
            "authors": [{ "lastName": "Smith", "foreName": "Jane", "affiliation": "" }]
        }])
    );
}

#[rstest]
#[case::default_key("pmid")]
#[case::legacy_key("_id")]
#[case::custom_key("articleId")]
fn test_decode_inverts_encode(#[case] key: &str) {
    let records = decode(EFETCH_THREE_ARTICLES);
    let serializer = RecordSerializer::new().with_identifier_key(key);

    let bytes = serializer.encode(&records).unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value[1][key], 33515491);

    assert_eq!(serializer.decode(&bytes).unwrap(), records);
}

#[test]
fn test_empty_set_is_empty_array() {
    let bytes = RecordSerializer::new()
        .pretty(true)
        .encode(&ArticleRecordSet::default())
        .unwrap();
    assert_eq!(bytes, b"[]");
}

#[test]
fn test_output_preserves_record_order() {
    let bytes = RecordSerializer::new()
        .encode(&decode(EFETCH_THREE_ARTICLES))
        .unwrap();

    let value: Value = serde_json::from_slice(&bytes).unwrap();
    let pmids: Vec<u64> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["pmid"].as_u64().unwrap())
        .collect();
    assert_eq!(pmids, vec![31978945, 33515491, 25760099]);
}

#[test]
fn test_clashing_key_surfaces_as_encode_error() {
    let err: PubMedError = RecordSerializer::new()
        .with_identifier_key("abstract")
        .encode(&decode(EFETCH_SINGLE_MINIMAL))
        .unwrap_err()
        .into();

    assert!(matches!(err, PubMedError::Encode(_)));
    assert_eq!(err.stage(), None);
}

#[test]
fn test_decode_with_wrong_key_fails() {
    let bytes = RecordSerializer::new()
        .with_identifier_key("_id")
        .encode(&decode(EFETCH_SINGLE_MINIMAL))
        .unwrap();

    assert!(RecordSerializer::new().decode(&bytes).is_err());
}

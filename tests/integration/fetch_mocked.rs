//! EFetch integration tests against a mocked E-utilities server

mod common;

use pubmed_retrieve::{
    ClientConfig, DecodeError, EntryPolicy, IdentifierList, PubMedClient, PubMedError, PubMedId,
    Stage,
};
use rstest::rstest;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

use common::{EFETCH_SINGLE_MINIMAL, EFETCH_THREE_ARTICLES, create_mock_client, xml_response};

fn ids(values: &[u32]) -> IdentifierList {
    IdentifierList {
        total_count: values.len() as u64,
        ids: values
            .iter()
            .map(|v| PubMedId::try_from_u32(*v).unwrap())
            .collect(),
    }
}

const MIXED_VALIDITY: &str = r#"<PubmedArticleSet>
    <PubmedArticle>
        <MedlineCitation><PMID>111</PMID><Article>
            <Journal><Title>Good Journal</Title></Journal>
            <AuthorList><Author><LastName>Valid</LastName></Author></AuthorList>
        </Article></MedlineCitation>
    </PubmedArticle>
    <PubmedArticle>
        <MedlineCitation><PMID>222</PMID><Article>
            <Journal><Title>Broken Journal</Title></Journal>
            <AuthorList><Author><ForeName>NoSurname</ForeName></Author></AuthorList>
        </Article></MedlineCitation>
    </PubmedArticle>
</PubmedArticleSet>"#;

#[tokio::test]
#[traced_test]
async fn test_fetch_sends_joined_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("id", "31978945,33515491,25760099"))
        .and(query_param("retmode", "xml"))
        .respond_with(xml_response(EFETCH_THREE_ARTICLES))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let records = client
        .fetch_articles(&ids(&[31978945, 33515491, 25760099]))
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    let journals: Vec<&str> = records.iter().map(|r| r.journal.as_str()).collect();
    assert_eq!(journals, vec!["Nature", "Lancet Oncology", "Science"]);
}

#[tokio::test]
async fn test_fetch_decodes_minimal_record() {
    let mock_server = MockServer::start().await;
    common::mount_efetch(&mock_server, EFETCH_SINGLE_MINIMAL).await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_articles(&ids(&[12345])).await.unwrap();

    let record = &records.articles[0];
    assert_eq!(record.pmid.as_u32(), 12345);
    assert_eq!(record.journal, "Cell");
    assert_eq!(record.r#abstract, "...");
    assert_eq!(record.pub_date.year, 2020);
    assert_eq!(record.pub_date.month, 0);
    assert_eq!(record.pub_date.day, 0);
    assert_eq!(record.authors.len(), 1);
    assert_eq!(record.authors[0].last_name, "Smith");
    assert_eq!(record.authors[0].fore_name, "Jane");
    assert_eq!(record.authors[0].affiliation, "");
}

#[tokio::test]
async fn test_fetch_maps_dates_affiliations_and_structured_abstracts() {
    let mock_server = MockServer::start().await;
    common::mount_efetch(&mock_server, EFETCH_THREE_ARTICLES).await;

    let client = create_mock_client(&mock_server);
    let records = client
        .fetch_articles(&ids(&[31978945, 33515491, 25760099]))
        .await
        .unwrap();

    let nature = &records.articles[0];
    assert_eq!(
        (nature.pub_date.year, nature.pub_date.month, nature.pub_date.day),
        (2020, 3, 12)
    );
    assert!(nature.authors[0].affiliation.starts_with("Shanghai Public Health"));
    assert_eq!(nature.authors[1].affiliation, "");

    let lancet = &records.articles[1];
    assert_eq!(lancet.pub_date.year, 2021);
    assert_eq!(
        lancet.r#abstract,
        "Recent advances in cancer treatment. Survival improved with CO2 laser therapy."
    );

    let science = &records.articles[2];
    assert_eq!((science.pub_date.year, science.pub_date.month), (2014, 11));
    assert_eq!(science.r#abstract, "");
}

#[tokio::test]
async fn test_fetch_omitted_records_are_absent() {
    let mock_server = MockServer::start().await;
    common::mount_efetch(&mock_server, common::efetch_articles(&[(1, "First"), (3, "Third")]))
        .await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_articles(&ids(&[1, 2, 3])).await.unwrap();

    let pmids: Vec<u32> = records.iter().map(|r| r.pmid.as_u32()).collect();
    assert_eq!(pmids, vec![1, 3]);
}

#[rstest]
#[case::skip(EntryPolicy::SkipMalformed)]
#[case::strict(EntryPolicy::Strict)]
#[tokio::test]
async fn test_fetch_entry_policy(#[case] policy: EntryPolicy) {
    let mock_server = MockServer::start().await;
    common::mount_efetch(&mock_server, MIXED_VALIDITY).await;

    let client = PubMedClient::with_config(
        ClientConfig::new()
            .with_base_url(mock_server.uri())
            .with_entry_policy(policy),
    );
    let result = client.fetch_articles(&ids(&[111, 222])).await;

    match policy {
        EntryPolicy::SkipMalformed => {
            let records = result.unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records.articles[0].journal, "Good Journal");
        }
        EntryPolicy::Strict => {
            let err = result.unwrap_err();
            assert_eq!(err.stage(), Some(Stage::Fetch));
            assert!(matches!(
                err,
                PubMedError::Decode {
                    source: DecodeError::MissingField { .. },
                    ..
                }
            ));
        }
    }
}

#[tokio::test]
async fn test_fetch_empty_article_set() {
    let mock_server = MockServer::start().await;
    common::mount_efetch(&mock_server, "<PubmedArticleSet></PubmedArticleSet>").await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_articles(&ids(&[99999999])).await.unwrap();
    assert!(records.is_empty());
}

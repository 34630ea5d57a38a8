//! Error propagation tests: every failure carries the stage it came from

mod common;

use pubmed_retrieve::{
    ClientConfig, DecodeError, FetchError, IdentifierList, PubMedClient, PubMedError, PubMedId,
    SearchQuery, Stage,
};
use rstest::rstest;
use tokio_test::assert_err;
use tracing_test::traced_test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{ESEARCH_THREE_IDS, create_mock_client, xml_response};

#[rstest]
#[case::server_error(500, true)]
#[case::bad_gateway(502, true)]
#[case::too_many_requests(429, true)]
#[case::not_found(404, false)]
#[case::bad_request(400, false)]
#[tokio::test]
async fn test_search_status_is_reported(#[case] status: u16, #[case] retryable: bool) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = assert_err!(client.search_articles(&SearchQuery::new("asthma")).await);

    assert_eq!(err.status(), Some(status));
    assert_eq!(err.stage(), Some(Stage::Search));
    assert_eq!(err.is_retryable(), retryable);
    assert!(err.to_string().contains("identifier resolution"));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_stage_failure_is_tagged_fetch() {
    let mock_server = MockServer::start().await;
    common::mount_esearch(&mock_server, ESEARCH_THREE_IDS).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .search_and_fetch(&SearchQuery::new("cancer").with_max_results(3))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Fetch));
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("record fetch"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = PubMedClient::with_config(ClientConfig::new().with_base_url("http://127.0.0.1:9"));

    let err = client
        .search_articles(&SearchQuery::new("asthma"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PubMedError::Fetch {
            stage: Stage::Search,
            source: FetchError::Transport(_),
        }
    ));
    assert_eq!(err.status(), None);
}

#[rstest]
#[case::html_error_page("<html><body>Service Unavailable</body></html>")]
#[case::truncated("<eSearchResult><Count>2</Count><IdList><Id>1</Id>")]
#[case::not_xml("this is not xml at all")]
#[case::missing_count("<eSearchResult><IdList><Id>1</Id></IdList></eSearchResult>")]
#[case::non_numeric_id("<eSearchResult><Count>1</Count><IdList><Id>abc</Id></IdList></eSearchResult>")]
#[tokio::test]
async fn test_malformed_search_body_is_decode_error(#[case] body: &str) {
    let mock_server = MockServer::start().await;
    common::mount_esearch(&mock_server, body).await;

    let client = create_mock_client(&mock_server);
    let err = client
        .search_articles(&SearchQuery::new("asthma"))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            PubMedError::Decode {
                stage: Stage::Search,
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_error_element_in_successful_response() {
    let mock_server = MockServer::start().await;
    common::mount_esearch(
        &mock_server,
        "<eSearchResult><ERROR>Invalid db name specified: pubmedd</ERROR></eSearchResult>",
    )
    .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .search_articles(&SearchQuery::new("asthma"))
        .await
        .unwrap_err();

    match err {
        PubMedError::Decode {
            stage: Stage::Search,
            source: DecodeError::Api { message },
        } => assert!(message.contains("Invalid db name")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_root_on_fetch_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(xml_response(
            "<eFetchResult><ERROR>Empty id list</ERROR></eFetchResult>",
        ))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let ids = IdentifierList {
        total_count: 1,
        ids: vec![PubMedId::try_from_u32(1).unwrap()],
    };
    let err = client.fetch_articles(&ids).await.unwrap_err();

    assert!(matches!(
        err,
        PubMedError::Decode {
            stage: Stage::Fetch,
            ..
        }
    ));
}

#[tokio::test]
async fn test_invalid_fetch_endpoint_is_query_build_error() {
    let mock_server = MockServer::start().await;
    common::mount_esearch(&mock_server, ESEARCH_THREE_IDS).await;

    let client = PubMedClient::with_config(
        ClientConfig::new()
            .with_search_url(format!("{}/esearch.fcgi", mock_server.uri()))
            .with_fetch_url("http://[::1"),
    );
    let err = client
        .search_and_fetch(&SearchQuery::new("cancer").with_max_results(3))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PubMedError::QueryBuild {
            stage: Stage::Fetch,
            ..
        }
    ));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_limit_above_maximum_is_rejected() {
    let client = PubMedClient::new();
    let err = client
        .search_articles(&SearchQuery::new("asthma").with_max_results(20_000))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PubMedError::SearchLimitExceeded {
            requested: 20_000,
            ..
        }
    ));
    assert_eq!(err.stage(), None);
}

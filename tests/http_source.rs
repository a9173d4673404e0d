//! HttpStudySource against a local registry stand-in

use serde_json::json;
use trialgraph::source::{
    fetch_all, FetchError, FetchResult, HttpStudySource, QueryParams, StudyPage, StudyQuery, StudySource,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run a blocking fetch off the async test runtime.
async fn fetch_page(base_url: String, params: QueryParams) -> FetchResult<StudyPage> {
    tokio::task::spawn_blocking(move || HttpStudySource::new(base_url)?.fetch_page(&params))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn query_params_are_sent_on_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/studies"))
        .and(query_param("format", "json"))
        .and(query_param("query.parser", "advanced"))
        .and(query_param("query.cond", "asthma"))
        .and(query_param("pageToken", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "studies": [{ "protocolSection": { "identificationModule": { "nctId": "NCT1" } } }],
            "nextPageToken": "T2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = StudyQuery::for_condition("asthma").to_params();
    params.insert("pageToken".to_string(), "T1".to_string());

    let page = fetch_page(format!("{}/api/", server.uri()), params).await.unwrap();
    assert_eq!(page.studies.len(), 1);
    assert_eq!(page.next_page_token.as_deref(), Some("T2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn error_status_is_not_decoded_as_a_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/studies"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "studies": [] })))
        .mount(&server)
        .await;

    let err = fetch_page(server.uri(), StudyQuery::default().to_params())
        .await
        .unwrap_err();
    match err {
        FetchError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/studies"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/studies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = fetch_page(server.uri(), StudyQuery::default().to_params())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_all_walks_pages_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/studies"))
        .and(query_param("pageToken", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "studies": [{ "n": 2 }] })))
        .expect(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/studies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "studies": [{ "n": 1 }],
            "nextPageToken": "T1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    let studies = tokio::task::spawn_blocking(move || {
        let source = HttpStudySource::new(base_url)?;
        fetch_all(&source, &StudyQuery::default())
    })
    .await
    .unwrap()
    .unwrap();

    let order: Vec<i64> = studies.iter().filter_map(|s| s["n"].as_i64()).collect();
    assert_eq!(order, vec![1, 2]);
}

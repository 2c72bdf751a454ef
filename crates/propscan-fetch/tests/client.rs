//! Integration tests for `FetchClient` using wiremock HTTP mocks.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use propscan_fetch::{FetchClient, FetchConfig, FetchError};

#[derive(Debug, Deserialize)]
struct Payload {
    answer: u32,
}

fn test_config(max_retries: u32) -> FetchConfig {
    FetchConfig {
        min_interval: Duration::ZERO,
        timeout: Duration::from_secs(5),
        max_retries,
        user_agent: "propscan-tests/0.1".to_owned(),
    }
}

fn endpoint(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{route}", server.uri())).expect("mock server URI should parse")
}

#[tokio::test]
async fn get_json_parses_typed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"answer": 42})))
        .mount(&server)
        .await;

    let client = FetchClient::new(&test_config(0)).unwrap();
    let payload: Payload = client.get_json(&endpoint(&server, "/payload")).await.unwrap();
    assert_eq!(payload.answer, 42);
}

#[tokio::test]
async fn exhausted_retries_perform_exactly_budgeted_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/always-500"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    // max_retries = 2 means 3 total attempts, then terminal failure.
    let client = FetchClient::new(&test_config(2)).unwrap();
    let result: Result<Payload, _> = client.get_json(&endpoint(&server, "/always-500")).await;

    let err = result.unwrap_err();
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn transient_failure_then_success_returns_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"answer": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(&test_config(3)).unwrap();
    let payload: Payload = client.get_json(&endpoint(&server, "/flaky")).await.unwrap();
    assert_eq!(payload.answer, 7);
}

#[tokio::test]
async fn unparseable_body_is_retried_then_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/garbage"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .expect(2)
        .mount(&server)
        .await;

    let client = FetchClient::new(&test_config(1)).unwrap();
    let result: Result<Payload, _> = client.get_json(&endpoint(&server, "/garbage")).await;

    assert!(
        matches!(result, Err(FetchError::Deserialize { .. })),
        "expected Deserialize error, got: {result:?}"
    );
}

#[tokio::test]
async fn get_json_with_status_surfaces_a_300_with_its_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ambiguous"))
        .respond_with(
            ResponseTemplate::new(300)
                .set_body_json(serde_json::json!({"disambiguation": ["a", "b"]})),
        )
        .mount(&server)
        .await;

    let client = FetchClient::new(&test_config(0)).unwrap();
    let (body, status) = client
        .get_json_with_status(&endpoint(&server, "/ambiguous"))
        .await
        .unwrap();

    assert_eq!(status.as_u16(), 300);
    assert!(body.get("disambiguation").is_some());
}

#[tokio::test]
async fn get_json_with_status_does_not_retry_non_2xx_with_parseable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"oops": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(&test_config(3)).unwrap();
    let (_, status) = client
        .get_json_with_status(&endpoint(&server, "/not-found"))
        .await
        .unwrap();
    assert_eq!(status.as_u16(), 404);
}

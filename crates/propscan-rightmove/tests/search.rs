//! Integration tests for `RightmoveClient` dispatch and pagination using
//! wiremock HTTP mocks.

use std::collections::HashMap;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use propscan_fetch::FetchConfig;
use propscan_rightmove::{PropertyType, RightmoveClient, SearchFilters};

fn test_config(max_retries: u32) -> FetchConfig {
    FetchConfig {
        min_interval: Duration::ZERO,
        timeout: Duration::from_secs(5),
        max_retries,
        user_agent: "propscan-tests/0.1".to_owned(),
    }
}

fn test_client(server: &MockServer, max_retries: u32, codes: &[(&str, u64)]) -> RightmoveClient {
    let codes: HashMap<String, u64> = codes
        .iter()
        .map(|(outcode, code)| ((*outcode).to_owned(), *code))
        .collect();
    RightmoveClient::with_base_url(&test_config(max_retries), codes, &server.uri())
        .expect("client construction should not fail")
}

/// One successful page body: `count` properties starting at `first_id`, with
/// the location name and reported total.
fn page_body(name: &str, total: u64, first_id: i64, count: i64) -> serde_json::Value {
    let properties: Vec<serde_json::Value> = (first_id..first_id + count)
        .map(|id| {
            serde_json::json!({
                "identifier": id,
                "propertyType": "flat",
                "latitude": 51.5,
                "longitude": -0.1,
                "price": 1500
            })
        })
        .collect();
    serde_json::json!({
        "result": "SUCCESS",
        "createDate": 1_600_000_000_000i64,
        "numReturnedResults": count,
        "radius": 0.0,
        "searchableLocation": {"name": name},
        "totalAvailableResults": total,
        "properties": properties
    })
}

async fn mount_page(
    server: &MockServer,
    identifier: &str,
    index: u64,
    body: serde_json::Value,
    expected_hits: u64,
) {
    Mock::given(method("GET"))
        .and(path("/rent/find"))
        .and(query_param("locationIdentifier", identifier))
        .and(query_param("index", index.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn pagination_fetches_every_page_and_accumulates_all_items() {
    let server = MockServer::start().await;
    // 123 items at 50 per page: pages at index 0, 50, 100.
    mount_page(&server, "OUTCODE^1", 0, page_body("SW10", 123, 0, 50), 1).await;
    mount_page(&server, "OUTCODE^1", 50, page_body("SW10", 123, 50, 50), 1).await;
    mount_page(&server, "OUTCODE^1", 100, page_body("SW10", 123, 100, 23), 1).await;

    let client = test_client(&server, 0, &[("SW10", 1)]);
    let results = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["SW10".to_owned()])
        .await
        .unwrap();

    let sw10 = results.get("SW10").expect("SW10 should be collected");
    assert_eq!(sw10.properties.len(), 123);
    assert_eq!(sw10.info.total_available_results, 123);
    assert_eq!(sw10.info.num_returned_results, 123);
}

#[tokio::test]
async fn failed_middle_page_is_skipped_and_the_shortfall_is_observable() {
    let server = MockServer::start().await;
    mount_page(&server, "OUTCODE^1", 0, page_body("SW10", 123, 0, 50), 1).await;
    Mock::given(method("GET"))
        .and(path("/rent/find"))
        .and(query_param("locationIdentifier", "OUTCODE^1"))
        .and(query_param("index", "50"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "OUTCODE^1", 100, page_body("SW10", 123, 100, 23), 1).await;

    let client = test_client(&server, 0, &[("SW10", 1)]);
    let results = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["SW10".to_owned()])
        .await
        .unwrap();

    let sw10 = results.get("SW10").expect("SW10 should still be collected");
    assert_eq!(sw10.properties.len(), 73, "pages 0 and 2 only");
    // Reported total and actual count are both exposed, and disagree.
    assert_eq!(sw10.info.total_available_results, 123);
    assert_eq!(sw10.info.num_returned_results, 73);
}

#[tokio::test]
async fn a_target_failing_its_first_page_is_dropped_without_aborting_siblings() {
    let server = MockServer::start().await;
    mount_page(&server, "OUTCODE^1", 0, page_body("SW10", 2, 0, 2), 1).await;
    Mock::given(method("GET"))
        .and(path("/rent/find"))
        .and(query_param("locationIdentifier", "OUTCODE^2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "OUTCODE^3", 0, page_body("E1", 1, 10, 1), 1).await;

    let client = test_client(&server, 0, &[("SW10", 1), ("N1", 2), ("E1", 3)]);
    let results = client
        .search(
            PropertyType::Rent,
            &SearchFilters::default(),
            &["SW10".to_owned(), "N1".to_owned(), "E1".to_owned()],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.get("SW10").is_some());
    assert!(results.get("E1").is_some());
    assert!(results.get("N1").is_none(), "failed target must be absent");
}

#[tokio::test]
async fn first_page_retries_are_exhausted_before_dropping_the_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rent/find"))
        .and(query_param("locationIdentifier", "OUTCODE^1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    // max_retries = 1 means two attempts on the first page, then give up.
    let client = test_client(&server, 1, &[("SW10", 1)]);
    let results = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["SW10".to_owned()])
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn a_zero_total_completes_without_further_page_fetches() {
    let server = MockServer::start().await;
    mount_page(&server, "OUTCODE^1", 0, page_body("SW10", 0, 0, 0), 1).await;

    let client = test_client(&server, 0, &[("SW10", 1)]);
    let results = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["SW10".to_owned()])
        .await
        .unwrap();

    let sw10 = results.get("SW10").expect("empty location is still recorded");
    assert!(sw10.properties.is_empty());
    assert_eq!(sw10.info.total_available_results, 0);
    // The per-mock expect(1) verifies on drop that only the first page was
    // requested.
}

#[tokio::test]
async fn an_unsuccessful_result_flag_fails_the_target() {
    let server = MockServer::start().await;
    let mut body = page_body("SW10", 1, 0, 1);
    body["result"] = serde_json::json!("FAILURE");
    mount_page(&server, "OUTCODE^1", 0, body, 1).await;

    let client = test_client(&server, 0, &[("SW10", 1)]);
    let results = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["SW10".to_owned()])
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn rerunning_a_search_yields_an_identical_result_set() {
    let server = MockServer::start().await;
    mount_page(&server, "OUTCODE^1", 0, page_body("SW10", 53, 0, 50), 2).await;
    mount_page(&server, "OUTCODE^1", 50, page_body("SW10", 53, 50, 3), 2).await;

    let client = test_client(&server, 0, &[("SW10", 1)]);
    let first = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["SW10".to_owned()])
        .await
        .unwrap();
    let second = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["SW10".to_owned()])
        .await
        .unwrap();

    let ids = |results: &propscan_rightmove::SearchResults| -> Vec<i64> {
        results.properties().map(|p| p.identifier).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.property_count(), 53);
}

#[tokio::test]
async fn unknown_outcodes_produce_an_empty_result_without_any_request() {
    let server = MockServer::start().await;
    let client = test_client(&server, 0, &[("SW10", 1)]);
    let results = client
        .search(PropertyType::Rent, &SearchFilters::default(), &["ZZ99".to_owned()])
        .await
        .unwrap();
    assert!(results.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

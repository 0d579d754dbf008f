//! Tests for the fetch module

use super::coordinator::Resolution;
use super::*;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::PageRequest;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue, LINK};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Sources
// ============================================================================

type Gate = oneshot::Sender<Result<Page<String>>>;

/// Source whose responses are released by the test, one gate per page
#[derive(Default)]
struct GatedSource {
    gates: Mutex<HashMap<u32, oneshot::Receiver<Result<Page<String>>>>>,
}

impl GatedSource {
    fn gate(&self, page: u32) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }
}

#[async_trait]
impl PageSource<String> for GatedSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<String>> {
        let gate = self.gates.lock().unwrap().remove(&request.page);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(Error::Other("gate dropped".to_string()))),
            None => Err(Error::Other(format!("no gate for page {}", request.page))),
        }
    }
}

fn page(items: &[&str], total_pages: u32) -> Page<String> {
    Page {
        items: items.iter().map(ToString::to_string).collect(),
        total_pages,
    }
}

/// Yield until the request for `page` has picked up its gate
async fn started(source: &GatedSource, page: u32) {
    while source.gates.lock().unwrap().contains_key(&page) {
        tokio::task::yield_now().await;
    }
}

fn coordinator(source: &Arc<GatedSource>) -> FetchCoordinator<String> {
    FetchCoordinator::new(source.clone())
}

// ============================================================================
// Page Tests
// ============================================================================

#[test]
fn test_page_total_from_link_header() {
    let mut headers = HeaderMap::new();
    headers.insert(
        LINK,
        HeaderValue::from_static(r#"<http://x/?_page=1>; rel="first", <http://x/?_page=5>; rel="last""#),
    );

    let page = Page::from_parts(vec![1, 2], &headers, PageRequest::new(1, 2));
    assert_eq!(page.total_pages, 5);
    assert_eq!(page.items, vec![1, 2]);
}

#[test]
fn test_page_without_link_header_falls_back_to_requested_page() {
    let page: Page<u8> = Page::from_parts(vec![], &HeaderMap::new(), PageRequest::new(3, 10));
    assert_eq!(page.total_pages, 3);
}

// ============================================================================
// Coordinator Tests
// ============================================================================

#[tokio::test]
async fn test_no_outcome_before_first_fetch() {
    let source = Arc::new(GatedSource::default());
    let mut coordinator = coordinator(&source);

    assert!(coordinator.outcome().is_none());
    assert!(!coordinator.is_pending());
    assert_eq!(coordinator.settle().await, None);
}

#[tokio::test]
async fn test_loading_then_succeeded() {
    let source = Arc::new(GatedSource::default());
    let gate = source.gate(1);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    assert_eq!(coordinator.outcome(), Some(&FetchOutcome::Loading));
    assert_eq!(coordinator.pending_request(), Some(PageRequest::new(1, 10)));

    gate.send(Ok(page(&["a", "b"], 4))).unwrap();
    let settled = coordinator.settle().await.unwrap();

    assert_eq!(settled.request, PageRequest::new(1, 10));
    assert_eq!(settled.total_pages, Some(4));
    assert_eq!(
        coordinator.outcome(),
        Some(&FetchOutcome::Succeeded {
            items: vec!["a".to_string(), "b".to_string()],
            total_pages: 4,
        })
    );
    assert!(!coordinator.is_pending());
}

#[tokio::test]
async fn test_superseded_request_never_emits() {
    let source = Arc::new(GatedSource::default());
    let first = source.gate(1);
    let second = source.gate(2);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    coordinator.fetch(PageRequest::new(2, 10));

    // The first response arrives before the second one
    let _ = first.send(Ok(page(&["stale"], 9)));
    second.send(Ok(page(&["fresh"], 3))).unwrap();

    let settled = coordinator.settle().await.unwrap();
    assert_eq!(settled.request, PageRequest::new(2, 10));
    assert_eq!(
        coordinator.outcome(),
        Some(&FetchOutcome::Succeeded {
            items: vec!["fresh".to_string()],
            total_pages: 3,
        })
    );
    assert_eq!(coordinator.settle().await, None);
}

#[tokio::test]
async fn test_stale_resolution_is_discarded() {
    let source = Arc::new(GatedSource::default());
    let _first = source.gate(1);
    let _second = source.gate(2);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    coordinator.fetch(PageRequest::new(2, 10));

    let applied = coordinator.apply(Resolution {
        generation: 1,
        request: PageRequest::new(1, 10),
        result: Ok(page(&["stale"], 9)),
    });

    assert_eq!(applied, None);
    assert_eq!(coordinator.outcome(), Some(&FetchOutcome::Loading));
    assert_eq!(coordinator.pending_request(), Some(PageRequest::new(2, 10)));

    let applied = coordinator.apply(Resolution {
        generation: 1,
        request: PageRequest::new(1, 10),
        result: Err(Error::http_status(500, "")),
    });
    assert_eq!(applied, None);
    assert_eq!(coordinator.outcome(), Some(&FetchOutcome::Loading));
}

#[tokio::test]
async fn test_superseded_request_is_aborted() {
    let source = Arc::new(GatedSource::default());
    let mut first = source.gate(1);
    let second = source.gate(2);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    started(&source, 1).await;
    coordinator.fetch(PageRequest::new(2, 10));
    second.send(Ok(page(&[], 2))).unwrap();
    coordinator.settle().await.unwrap();

    // The first request's future is dropped, closing its gate
    tokio::time::timeout(Duration::from_secs(1), first.closed())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_failure_then_retry_succeeds() {
    let source = Arc::new(GatedSource::default());
    let failing = source.gate(2);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(2, 10));
    failing.send(Err(Error::http_status(500, "boom"))).unwrap();
    let settled = coordinator.settle().await.unwrap();

    assert_eq!(settled.total_pages, None);
    assert!(coordinator.outcome().unwrap().is_failed());

    let retry = source.gate(2);
    coordinator.fetch(PageRequest::new(2, 10));
    assert!(coordinator.outcome().unwrap().is_loading());
    retry.send(Ok(page(&["x"], 2))).unwrap();
    coordinator.settle().await.unwrap();

    assert!(coordinator.outcome().unwrap().is_succeeded());
}

#[tokio::test]
async fn test_cancel_emits_nothing() {
    let source = Arc::new(GatedSource::default());
    let _gate = source.gate(1);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    coordinator.cancel();

    assert!(!coordinator.is_pending());
    assert_eq!(coordinator.settle().await, None);
    assert_eq!(coordinator.outcome(), None);
}

#[tokio::test]
async fn test_cancel_restores_previous_outcome() {
    let source = Arc::new(GatedSource::default());
    let first = source.gate(1);
    let _second = source.gate(2);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    first.send(Ok(page(&["a"], 2))).unwrap();
    coordinator.settle().await.unwrap();

    coordinator.fetch(PageRequest::new(2, 10));
    assert!(coordinator.outcome().unwrap().is_loading());

    coordinator.cancel();
    assert_eq!(
        coordinator.outcome(),
        Some(&FetchOutcome::Succeeded {
            items: vec!["a".to_string()],
            total_pages: 2,
        })
    );
    assert_eq!(coordinator.settle().await, None);
}

#[tokio::test]
async fn test_source_reporting_cancelled_is_failed() {
    let source = Arc::new(GatedSource::default());
    let gate = source.gate(1);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    gate.send(Err(Error::Cancelled)).unwrap();

    let settled = tokio::time::timeout(Duration::from_secs(1), coordinator.settle())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(settled.total_pages, None);
    assert!(!coordinator.is_pending());
    assert!(coordinator.outcome().unwrap().is_failed());
}

struct PanickingSource;

#[async_trait]
impl PageSource<String> for PanickingSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<String>> {
        panic!("page {} exploded", request.page);
    }
}

#[tokio::test]
async fn test_panicking_source_is_failed() {
    let mut coordinator: FetchCoordinator<String> = FetchCoordinator::new(Arc::new(PanickingSource));

    coordinator.fetch(PageRequest::new(3, 10));
    let settled = tokio::time::timeout(Duration::from_secs(1), coordinator.settle())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(settled.request, PageRequest::new(3, 10));
    assert!(!coordinator.is_pending());
    match coordinator.outcome() {
        Some(FetchOutcome::Failed { reason }) => {
            assert!(reason.contains("ended without a response"));
        }
        other => panic!("Expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_drop_cancels_in_flight_request() {
    let source = Arc::new(GatedSource::default());
    let mut gate = source.gate(1);
    let mut coordinator = coordinator(&source);

    coordinator.fetch(PageRequest::new(1, 10));
    started(&source, 1).await;
    drop(coordinator);

    tokio::time::timeout(Duration::from_secs(1), gate.closed())
        .await
        .unwrap();
}

// ============================================================================
// HTTP Source Tests
// ============================================================================

fn http_coordinator(server: &MockServer) -> FetchCoordinator<serde_json::Value> {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    let client = HttpClient::with_config(config).unwrap();
    FetchCoordinator::new(Arc::new(HttpPageSource::new(client, "/invoices")))
}

#[tokio::test]
async fn test_http_source_reads_total_from_link() {
    let mock_server = MockServer::start().await;
    let link = format!(
        r#"<{0}/invoices?_page=1&_limit=2>; rel="first", <{0}/invoices?_page=5&_limit=2>; rel="last""#,
        mock_server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("_page", "1"))
        .and(query_param("_limit", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link.as_str())
                .set_body_json(json!([{"id": "1"}, {"id": "2"}])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut coordinator = http_coordinator(&mock_server);
    coordinator.fetch(PageRequest::new(1, 2));
    let settled = coordinator.settle().await.unwrap();

    assert_eq!(settled.total_pages, Some(5));
    match coordinator.outcome() {
        Some(FetchOutcome::Succeeded { items, total_pages }) => {
            assert_eq!(items.len(), 2);
            assert_eq!(*total_pages, 5);
        }
        other => panic!("Expected Succeeded, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_source_without_link_uses_requested_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("_page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "9"}])))
        .mount(&mock_server)
        .await;

    let mut coordinator = http_coordinator(&mock_server);
    coordinator.fetch(PageRequest::new(3, 10));
    let settled = coordinator.settle().await.unwrap();

    assert_eq!(settled.total_pages, Some(3));
}

#[tokio::test]
async fn test_http_source_status_error_is_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut coordinator = http_coordinator(&mock_server);
    coordinator.fetch(PageRequest::new(1, 10));
    coordinator.settle().await.unwrap();

    assert!(coordinator.outcome().unwrap().is_failed());
}

#[tokio::test]
async fn test_http_source_bad_body_is_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let mut coordinator = http_coordinator(&mock_server);
    coordinator.fetch(PageRequest::new(1, 10));
    coordinator.settle().await.unwrap();

    match coordinator.outcome() {
        Some(FetchOutcome::Failed { reason }) => {
            assert!(reason.contains("Failed to decode response"));
        }
        other => panic!("Expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_slow_stale_response_is_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("_page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!([{"id": "stale"}])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "fresh"}])))
        .mount(&mock_server)
        .await;

    let mut coordinator = http_coordinator(&mock_server);
    coordinator.fetch(PageRequest::new(1, 10));
    coordinator.fetch(PageRequest::new(2, 10));
    let settled = coordinator.settle().await.unwrap();
    assert_eq!(settled.request.page, 2);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(coordinator.settle().await, None);
    assert_eq!(
        coordinator.outcome(),
        Some(&FetchOutcome::Succeeded {
            items: vec![json!({"id": "fresh"})],
            total_pages: 2,
        })
    );
}

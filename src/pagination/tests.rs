//! Tests for pagination module

use super::*;
use crate::decode::{PageResult, RawRecord, ResponseParser};
use crate::http::Transport;
use crate::projection::{RecordProjection, TitleProjection};
use crate::query::{QueryDescriptor, Request};
use crate::types::namespace;
use crate::{Error, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// Fixtures
// ============================================================================

/// Replays canned responses and records every request it sees
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> Request {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &Request) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport("no scripted response left")))
    }
}

fn page(rows: &[(&str, u64, i32)], token: Option<&str>) -> Result<String> {
    let rows: String = rows
        .iter()
        .map(|(title, id, ns)| format!(r#"<cm pageid="{id}" ns="{ns}" title="{title}" />"#))
        .collect();
    let marker = token
        .map(|t| format!(r#"<continue cmcontinue="{t}" continue="-||" />"#))
        .unwrap_or_default();
    Ok(format!(
        r#"<?xml version="1.0"?><api>{marker}<query><categorymembers>{rows}</categorymembers></query></api>"#
    ))
}

fn chemical_elements() -> QueryDescriptor {
    QueryDescriptor::builder("Chemical elements")
        .namespace(namespace::MAIN)
        .page_limit(50)
        .build()
        .unwrap()
}

fn title_engine(transport: &Arc<ScriptedTransport>) -> PaginationEngine<TitleProjection> {
    PaginationEngine::new(chemical_elements(), transport.clone(), TitleProjection)
}

// ============================================================================
// EngineState Tests
// ============================================================================

#[test]
fn test_engine_state_lifecycle() {
    let mut state = EngineState::new();
    assert_eq!(state.phase, EnginePhase::Uninitialized);

    state.start();
    assert_eq!(state.phase, EnginePhase::AwaitingFetch);

    state.refill(PageResult::new(
        vec![RawRecord::new("A", 1, 0)],
        Some("T1".to_string()),
    ));
    assert_eq!(state.phase, EnginePhase::Buffered);
    assert_eq!(state.token.as_deref(), Some("T1"));

    assert!(state.pop_front().is_some());
    assert_eq!(state.phase, EnginePhase::AwaitingFetch);

    state.refill(PageResult::new(vec![RawRecord::new("B", 2, 0)], None));
    assert_eq!(state.token, None);
    assert!(state.pop_front().is_some());
    assert_eq!(state.phase, EnginePhase::Exhausted);
    assert!(state.pop_front().is_none());
}

#[test]
fn test_engine_state_empty_terminal_page() {
    let mut state = EngineState::new();
    state.start();
    state.refill(PageResult::default());
    assert_eq!(state.phase, EnginePhase::Exhausted);
}

#[test]
fn test_engine_state_empty_page_with_token() {
    let mut state = EngineState::new();
    state.start();
    state.refill(PageResult::new(vec![], Some("T9".to_string())));
    assert_eq!(state.phase, EnginePhase::Buffered);

    state.settle_empty();
    assert_eq!(state.phase, EnginePhase::AwaitingFetch);
}

#[test]
fn test_engine_state_exhaust_drops_token() {
    let mut state = EngineState::new();
    state.token = Some("T1".to_string());
    state.exhaust();
    assert_eq!(state.token, None);
    assert!(state.phase.is_exhausted());
}

// ============================================================================
// Engine Scenarios
// ============================================================================

#[tokio::test]
async fn test_single_page_listing() {
    let transport = ScriptedTransport::new(vec![page(
        &[("Hydrogen", 1, 0), ("Helium", 2, 0)],
        None,
    )]);
    let mut engine = title_engine(&transport);
    assert_eq!(engine.phase(), EnginePhase::AwaitingFetch);

    assert_eq!(engine.take_next().await.unwrap().as_deref(), Some("Hydrogen"));
    assert_eq!(engine.take_next().await.unwrap().as_deref(), Some("Helium"));
    assert_eq!(engine.take_next().await.unwrap(), None);
    assert_eq!(engine.phase(), EnginePhase::Exhausted);
    assert_eq!(transport.calls(), 1);

    let request = transport.request(0);
    assert_eq!(request.get_param("cmtitle"), Some("Category:Chemical_elements"));
    assert_eq!(request.get_param("cmnamespace"), Some("0"));
    assert_eq!(request.get_param("cmlimit"), Some("50"));
}

#[tokio::test]
async fn test_continuation_across_two_pages() {
    let transport = ScriptedTransport::new(vec![
        page(&[("Hydrogen", 1, 0)], Some("T1")),
        page(&[("Helium", 2, 0)], None),
    ]);
    let engine = title_engine(&transport);

    let items = engine.collect_all().await.unwrap();

    assert_eq!(items, vec!["Hydrogen".to_string(), "Helium".to_string()]);
    assert_eq!(transport.calls(), 2);
    assert_eq!(transport.request(0).get_param("cmcontinue"), None);
    assert_eq!(transport.request(1).get_param("cmcontinue"), Some("T1"));
}

#[tokio::test]
async fn test_server_error_is_terminal() {
    let transport = ScriptedTransport::new(vec![Ok(
        r#"<api><error code="permissiondenied" info="permission denied" /></api>"#.to_string(),
    )]);
    let mut engine = title_engine(&transport);

    let err = engine.take_next().await.unwrap_err();
    assert_eq!(err.server_info(), Some("permission denied"));
    assert!(engine.is_exhausted());

    assert_eq!(engine.take_next().await.unwrap(), None);
    assert!(!engine.has_more().await.unwrap());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_malformed_record_is_skipped() {
    let transport = ScriptedTransport::new(vec![Ok(r#"<api><query><categorymembers>
            <cm pageid="1" ns="0" title="Hydrogen" />
            <cm pageid="2" title="Helium" />
        </categorymembers></query></api>"#
        .to_string())]);
    let engine = title_engine(&transport);

    let items = engine.collect_all().await.unwrap();
    assert_eq!(items, vec!["Hydrogen".to_string()]);
}

#[tokio::test]
async fn test_empty_first_page_exhausts() {
    let transport = ScriptedTransport::new(vec![page(&[], None)]);
    let mut engine = title_engine(&transport);

    assert!(!engine.has_more().await.unwrap());
    assert_eq!(engine.phase(), EnginePhase::Exhausted);
    assert_eq!(engine.take_next().await.unwrap(), None);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_empty_page_with_token_keeps_fetching() {
    let transport = ScriptedTransport::new(vec![
        page(&[], Some("T1")),
        page(&[], Some("T2")),
        page(&[("Lithium", 3, 0)], None),
    ]);
    let mut engine = title_engine(&transport);

    assert!(engine.has_more().await.unwrap());
    assert_eq!(transport.calls(), 3);
    assert_eq!(transport.request(2).get_param("cmcontinue"), Some("T2"));
    assert_eq!(engine.take_buffered().as_deref(), Some("Lithium"));
    assert!(!engine.has_more().await.unwrap());
}

#[tokio::test]
async fn test_non_empty_page_does_not_imply_more() {
    let rows: Vec<(&str, u64, i32)> = vec![("Page", 1, 0); 50];
    let transport = ScriptedTransport::new(vec![page(&rows, None)]);
    let engine = title_engine(&transport);

    let items = engine.collect_all().await.unwrap();
    assert_eq!(items.len(), 50);
    assert_eq!(transport.calls(), 1);
}

// ============================================================================
// Failure Policy Tests
// ============================================================================

#[tokio::test]
async fn test_transport_failure_is_retryable_with_identical_request() {
    let transport = ScriptedTransport::new(vec![
        page(&[("Hydrogen", 1, 0)], Some("T1")),
        Err(Error::transport("connection reset")),
        page(&[("Helium", 2, 0)], None),
    ]);
    let mut engine = title_engine(&transport);

    assert_eq!(engine.take_next().await.unwrap().as_deref(), Some("Hydrogen"));

    let err = engine.take_next().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(engine.phase(), EnginePhase::AwaitingFetch);
    assert_eq!(engine.state().token.as_deref(), Some("T1"));

    assert_eq!(engine.take_next().await.unwrap().as_deref(), Some("Helium"));
    assert_eq!(transport.calls(), 3);
    assert_eq!(transport.request(1), transport.request(2));
    assert_eq!(engine.take_next().await.unwrap(), None);
}

#[tokio::test]
async fn test_first_fetch_failure_retries_first_request() {
    let transport = ScriptedTransport::new(vec![
        Err(Error::http_status(503, "busy")),
        page(&[("Hydrogen", 1, 0)], None),
    ]);
    let mut engine = title_engine(&transport);

    assert!(engine.take_next().await.is_err());
    assert_eq!(engine.state().token, None);
    assert_eq!(engine.take_next().await.unwrap().as_deref(), Some("Hydrogen"));
    assert_eq!(transport.request(0), transport.request(1));
}

struct FailingParser;

impl ResponseParser for FailingParser {
    fn parse(&self, _body: &str) -> Result<PageResult> {
        Err(Error::Other("garbled body".to_string()))
    }
}

#[tokio::test]
async fn test_non_server_parse_failure_is_not_terminal() {
    let transport = ScriptedTransport::new(vec![page(&[("Hydrogen", 1, 0)], None)]);
    let mut engine = title_engine(&transport).with_parser(FailingParser);

    assert!(engine.take_next().await.is_err());
    assert_eq!(engine.phase(), EnginePhase::AwaitingFetch);
    assert!(!engine.is_exhausted());
}

#[tokio::test]
async fn test_repeated_token_ends_listing() {
    let transport = ScriptedTransport::new(vec![
        page(&[("Hydrogen", 1, 0)], Some("T1")),
        page(&[("Helium", 2, 0)], Some("T1")),
        page(&[("Never", 3, 0)], None),
    ]);
    let engine = title_engine(&transport);

    let items = engine.collect_all().await.unwrap();
    assert_eq!(items, vec!["Hydrogen".to_string(), "Helium".to_string()]);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_cycling_tokens_end_listing() {
    let transport = ScriptedTransport::new(vec![
        page(&[("Hydrogen", 1, 0)], Some("T1")),
        page(&[("Helium", 2, 0)], Some("T2")),
        page(&[("Lithium", 3, 0)], Some("T1")),
        page(&[("Never", 4, 0)], None),
    ]);
    let engine = title_engine(&transport);

    let items = engine.collect_all().await.unwrap();
    assert_eq!(
        items,
        vec![
            "Hydrogen".to_string(),
            "Helium".to_string(),
            "Lithium".to_string()
        ]
    );
    assert_eq!(transport.calls(), 3);
    assert_eq!(transport.request(1).get_param("cmcontinue"), Some("T1"));
    assert_eq!(transport.request(2).get_param("cmcontinue"), Some("T2"));
}

#[tokio::test]
async fn test_failed_fetch_does_not_mark_token_used() {
    let transport = ScriptedTransport::new(vec![
        page(&[("Hydrogen", 1, 0)], Some("T1")),
        Err(Error::transport("connection reset")),
        page(&[("Helium", 2, 0)], Some("T2")),
        page(&[("Lithium", 3, 0)], None),
    ]);
    let mut engine = title_engine(&transport);

    assert_eq!(engine.take_next().await.unwrap().as_deref(), Some("Hydrogen"));
    assert!(engine.take_next().await.is_err());

    let rest: Vec<String> = engine.into_stream().try_collect().await.unwrap();
    assert_eq!(rest, vec!["Helium".to_string(), "Lithium".to_string()]);
    assert_eq!(transport.calls(), 4);
}

// ============================================================================
// Explicit Buffering Tests
// ============================================================================

#[tokio::test]
async fn test_peek_and_take_buffered_never_fetch() {
    let transport = ScriptedTransport::new(vec![page(&[("Hydrogen", 1, 0)], None)]);
    let mut engine = title_engine(&transport);

    assert_eq!(engine.peek(), None);
    assert_eq!(engine.take_buffered(), None);
    assert_eq!(transport.calls(), 0);

    assert!(engine.ensure_buffered().await.unwrap());
    assert_eq!(engine.buffered(), 1);
    assert_eq!(engine.peek().as_deref(), Some("Hydrogen"));
    assert_eq!(engine.peek().as_deref(), Some("Hydrogen"));
    assert_eq!(engine.take_buffered().as_deref(), Some("Hydrogen"));
    assert_eq!(engine.take_buffered(), None);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_record_projection_and_stats() {
    let transport = ScriptedTransport::new(vec![
        Ok(r#"<api><continue cmcontinue="T1" continue="-||" /><query><categorymembers>
            <cm pageid="10" ns="14" title="Category:Metals" />
            <cm pageid="x" ns="0" title="Bad" />
        </categorymembers></query></api>"#
            .to_string()),
        page(&[("Iron", 26, 0)], None),
    ]);
    let mut engine =
        PaginationEngine::new(chemical_elements(), transport.clone(), RecordProjection);

    let mut items = Vec::new();
    while let Some(item) = engine.take_next().await.unwrap() {
        items.push(item);
    }

    assert_eq!(
        items,
        vec![
            RawRecord::new("Category:Metals", 10, 14),
            RawRecord::new("Iron", 26, 0),
        ]
    );
    assert_eq!(
        *engine.stats(),
        EngineStats {
            requests: 2,
            pages: 2,
            items_yielded: 2,
            records_skipped: 1,
        }
    );
}

#[tokio::test]
async fn test_into_stream() {
    let transport = ScriptedTransport::new(vec![
        page(&[("Hydrogen", 1, 0)], Some("T1")),
        page(&[("Helium", 2, 0)], None),
    ]);
    let items: Vec<String> = title_engine(&transport)
        .into_stream()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(items, vec!["Hydrogen".to_string(), "Helium".to_string()]);
}

#[tokio::test]
async fn test_into_stream_stops_on_server_error() {
    let transport = ScriptedTransport::new(vec![Ok(
        r#"<api><error code="badcontinue" info="Invalid continue param" /></api>"#.to_string(),
    )]);
    let results: Vec<Result<String>> =
        futures::StreamExt::collect(title_engine(&transport).into_stream()).await;
    assert_eq!(results.len(), 1);
    assert!(results[0].as_ref().unwrap_err().is_server());
}

#[tokio::test]
async fn test_shared_engine_serializes_consumers() {
    let transport = ScriptedTransport::new(vec![
        page(&[("Hydrogen", 1, 0), ("Helium", 2, 0)], Some("T1")),
        page(&[("Lithium", 3, 0), ("Beryllium", 4, 0)], None),
    ]);
    let shared = title_engine(&transport).into_shared();

    let mut handles = Vec::new();
    for _ in 0..2 {
        let engine = shared.clone();
        handles.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            loop {
                let next = engine.lock().await.take_next().await.unwrap();
                match next {
                    Some(title) => seen.push(title),
                    None => break,
                }
            }
            seen
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.await.unwrap());
    }
    all.sort();

    assert_eq!(all, vec!["Beryllium", "Helium", "Hydrogen", "Lithium"]);
    assert_eq!(transport.calls(), 2);
}

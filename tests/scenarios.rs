use property_report::catalog::{seed, InMemoryCatalog, PropertyCatalog};
use property_report::email::{EmailDispatcher, EmailMessage, HttpEmailDispatcher, MockEmailDispatcher};
use property_report::error::{DispatchError, LeadError};
use property_report::gate::{FileStore, GateState, MemoryStore, UnlockGate};
use property_report::lead::LeadPipeline;
use property_report::models::LeadSubmission;
use property_report::report::{Aggregator, Synthesizer};
use property_report::search::{is_match, Matcher};
use property_report::view::{
    DetailState, DetailView, RenderMode, SearchOutcome, SearchSession, Section, DEFAULT_DEBOUNCE,
    DEFAULT_PROMPT_DELAY,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    aggregator: Aggregator,
    gate: UnlockGate,
    matcher: Arc<Matcher>,
}

async fn harness(gate: UnlockGate) -> Harness {
    let catalog: Arc<dyn PropertyCatalog> = Arc::new(seed::demo_catalog());
    let summaries = catalog.summaries().await.unwrap();
    Harness {
        aggregator: Aggregator::new(catalog, Synthesizer::default()),
        gate,
        matcher: Arc::new(Matcher::new(summaries)),
    }
}

fn memory_gate() -> UnlockGate {
    UnlockGate::new(Arc::new(MemoryStore::new()))
}

#[tokio::test(start_paused = true)]
async fn happy_path_search_view_and_unlock() {
    let h = harness(memory_gate()).await;
    let session = SearchSession::new(h.matcher.clone(), DEFAULT_DEBOUNCE);

    let results = match session.input("Shields").await {
        SearchOutcome::Applied(results) => results,
        SearchOutcome::Superseded => panic!("single query cannot be superseded"),
    };
    let selected = results
        .iter()
        .find(|r| r.display_address.starts_with("30 Shields Street, Redcliffe"))
        .expect("30 Shields Street in results");
    assert_eq!(selected.id, "VC-9552-CQ");

    let view = DetailView::new(h.aggregator.clone(), h.gate.clone(), DEFAULT_PROMPT_DELAY);
    let state = view.open(&selected.id).await.unwrap();
    let DetailState::Ready(report) = state else {
        panic!("report should load");
    };
    let estimate = &report.detail.price_estimate;
    assert!(estimate.low <= estimate.mid && estimate.mid <= estimate.high);
    assert!(report.plan.is_obscured(Section::Comparables));
    assert!(!h.gate.is_unlocked("VC-9552-CQ").await);

    let dispatcher = Arc::new(MockEmailDispatcher::new());
    let pipeline = LeadPipeline::new(dispatcher.clone(), h.gate.clone());
    let receipt = view
        .submit_lead(&pipeline, &LeadSubmission::new("Jane Doe", "jane@example.com"))
        .await
        .unwrap();

    assert!(receipt.unlocked);
    assert!(!receipt.has_warning());
    assert_eq!(dispatcher.count().await, 1);
    assert!(h.gate.is_unlocked("VC-9552-CQ").await);

    let DetailState::Ready(report) = view.current() else {
        panic!("report should stay loaded");
    };
    assert!(report.plan.sections.iter().all(|s| s.mode == RenderMode::Clear));
    assert_eq!(pipeline.prefill().await.unwrap().email, "jane@example.com");
}

#[tokio::test]
async fn invalid_email_never_reaches_dispatcher() {
    let h = harness(memory_gate()).await;
    let dispatcher = Arc::new(MockEmailDispatcher::new());
    let pipeline = LeadPipeline::new(dispatcher.clone(), h.gate.clone());
    let detail = h.aggregator.get_property_details("VC-9552-CQ").await.unwrap();

    let err = pipeline
        .submit(&LeadSubmission::new("Jane", "not-an-email"), Some(&detail))
        .await
        .unwrap_err();

    let LeadError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "email");
    assert_eq!(dispatcher.count().await, 0);
    assert_eq!(h.gate.state("VC-9552-CQ").await, GateState::Locked);
}

#[tokio::test]
async fn mail_provider_down_still_unlocks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send-email"))
        .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
            "error": "Upstream mail provider unavailable"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(memory_gate()).await;
    let dispatcher: Arc<dyn EmailDispatcher> =
        Arc::new(HttpEmailDispatcher::new(format!("{}/api/send-email", server.uri())).unwrap());
    let pipeline = LeadPipeline::new(dispatcher, h.gate.clone());
    let detail = h.aggregator.get_property_details("VC-9552-CQ").await.unwrap();

    let receipt = pipeline
        .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), Some(&detail))
        .await
        .unwrap();

    assert!(receipt.unlocked);
    assert!(receipt.has_warning());
    assert!(receipt.message_id.is_none());
    assert!(h.gate.is_unlocked("VC-9552-CQ").await);
}

#[tokio::test]
async fn missing_credentials_degrade_like_transport_failure() {
    let h = harness(memory_gate()).await;
    let dispatcher = Arc::new(MockEmailDispatcher::failing(DispatchError::Configuration(
        "Email service not configured".into(),
    )));
    let pipeline = LeadPipeline::new(dispatcher.clone(), h.gate.clone());

    let receipt = pipeline
        .submit(
            &LeadSubmission {
                property_id: Some("VC-2380-SP".into()),
                ..LeadSubmission::new("Jane Doe", "jane@example.com")
            },
            None,
        )
        .await
        .unwrap();

    assert!(receipt.unlocked);
    assert!(receipt.has_warning());
    let sent = dispatcher.sent().await;
    assert!(matches!(sent.as_slice(), [EmailMessage::Lead(_)]));
}

#[tokio::test]
async fn unknown_suburb_gets_generic_insights() {
    let h = harness(memory_gate()).await;
    let detail = h.aggregator.get_property_details("VC-3095-SC").await.unwrap();

    assert_eq!(detail.summary.suburb, "Scarborough");
    assert_eq!(detail.suburb_insights.median_price, 750_000);
    assert!(!detail.comparables.is_empty());
    assert!(!detail.schools.is_empty());
    assert!(detail.sales_history.iter().all(|s| s.sale_price >= 0));
}

#[tokio::test]
async fn unlock_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("state.json");

    {
        let gate = UnlockGate::new(Arc::new(FileStore::open(&store_path).await.unwrap()));
        assert!(!gate.is_unlocked("VC-7731-BB").await);
        let pipeline = LeadPipeline::new(Arc::new(MockEmailDispatcher::new()), gate.clone());
        let h = harness(gate).await;
        let detail = h.aggregator.get_property_details("VC-7731-BB").await.unwrap();
        pipeline
            .submit(&LeadSubmission::new("Jane Doe", "jane@example.com"), Some(&detail))
            .await
            .unwrap();
    }

    let reopened = UnlockGate::new(Arc::new(FileStore::open(&store_path).await.unwrap()));
    assert!(reopened.is_unlocked("VC-7731-BB").await);
    assert!(!reopened.is_unlocked("VC-9552-CQ").await);
    assert_eq!(reopened.last_profile().await.unwrap().name, "Jane Doe");
}

#[tokio::test]
async fn repeated_unlock_is_idempotent() {
    let gate = memory_gate();
    gate.unlock("VC-6120-SY", "jane@example.com").await.unwrap();
    let once = gate.record("VC-6120-SY").await.unwrap();
    gate.unlock("VC-6120-SY", "jane@example.com").await.unwrap();

    assert_eq!(gate.record("VC-6120-SY").await.unwrap(), once);
    assert_eq!(gate.state("VC-6120-SY").await, GateState::Unlocked);
}

#[tokio::test(start_paused = true)]
async fn only_latest_query_is_applied() {
    let h = harness(memory_gate()).await;
    let session = Arc::new(SearchSession::new(h.matcher.clone(), DEFAULT_DEBOUNCE));

    let earlier = tokio::spawn({
        let session = session.clone();
        async move { session.input("syd").await }
    });
    tokio::time::sleep(Duration::from_millis(120)).await;
    let later = session.input("redcliffe").await;

    assert_eq!(earlier.await.unwrap(), SearchOutcome::Superseded);
    assert!(matches!(later, SearchOutcome::Applied(_)));
    let visible = session.current();
    assert_eq!(visible.query, "redcliffe");
    assert!(!visible.results.is_empty());
    assert!(visible.results.iter().all(|r| is_match(r, "redcliffe")));
}

#[tokio::test]
async fn catalog_file_drives_search_and_details() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("catalog.json");
    tokio::fs::write(&file, serde_json::to_string(&seed::demo_data()).unwrap())
        .await
        .unwrap();

    let catalog = InMemoryCatalog::from_json_file(&file).await.unwrap();
    assert_eq!(catalog.len(), seed::demo_catalog().len());

    let catalog: Arc<dyn PropertyCatalog> = Arc::new(catalog);
    let matcher = Matcher::new(catalog.summaries().await.unwrap());
    let gc = matcher.search("gc");
    assert!(gc.iter().any(|r| r.suburb == "Surfers Paradise"));

    let aggregator = Aggregator::new(catalog, Synthesizer::default());
    let detail = aggregator.get_property_details("VC-9552-CQ").await.unwrap();
    assert_eq!(detail.comparables[0].address, "14 Shields Street, Redcliffe");
}

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::*;
use crate::error::{ErrorKind, INVALID_EXTENSION_MESSAGE, NO_FILE_SELECTED_MESSAGE};
use crate::models::ScalarValue;

const ENDPOINT: &str = "http://analysis.test/analyze_mesh/";

type Reply = Result<HttpReply, TransportFailure>;

struct FakeClient {
    reply: Box<dyn Fn() -> Reply + Send + Sync>,
    calls: Mutex<Vec<(String, FilePart)>>,
}

impl FakeClient {
    fn new(reply: impl Fn() -> Reply + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn ok(body: &'static str) -> Self {
        Self::new(move || Ok(HttpReply::new(StatusCode::OK, body)))
    }

    fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalysisClient for FakeClient {
    async fn post(&self, url: &str, part: FilePart) -> Result<HttpReply, TransportFailure> {
        self.calls.lock().unwrap().push((url.to_string(), part));
        (self.reply)()
    }
}

fn controller(client: FakeClient) -> UploadController<FakeClient> {
    UploadController::new(client, ENDPOINT)
}

fn mesh(name: &str) -> Option<FileRef> {
    Some(FileRef::new(name, &b"solid cube\nendsolid cube\n"[..]))
}

fn error_message<C: AnalysisClient>(c: &UploadController<C>) -> &str {
    &c.error().expect("error region should be set").message
}

#[test]
fn rejects_unsupported_extensions() {
    for name in ["cube.3mf", "cube.step", "cube", "cube.stl.bak", "CUBE.STL", "teapot.OBJ"] {
        let mut c = controller(FakeClient::ok("{}"));
        c.select_file(mesh(name));

        assert_eq!(c.phase(), InteractionPhase::Idle, "{name}");
        assert!(c.selected().is_none());
        assert_eq!(error_message(&c), INVALID_EXTENSION_MESSAGE);
        assert_eq!(c.error().unwrap().kind, ErrorKind::Validation);
    }
}

#[test]
fn empty_pick_is_a_validation_error() {
    let mut c = controller(FakeClient::ok("{}"));
    c.select_file(mesh("cube.stl"));
    c.select_file(None);

    assert!(c.selected().is_none());
    assert_eq!(c.phase(), InteractionPhase::Idle);
    assert_eq!(error_message(&c), INVALID_EXTENSION_MESSAGE);
}

#[test]
fn accepts_lowercase_stl_and_obj() {
    for name in ["cube.stl", "teapot.obj", "Cube.stl", "my.Teapot.obj"] {
        let mut c = controller(FakeClient::ok("{}"));
        c.select_file(mesh("bad.txt"));
        c.select_file(mesh(name));

        assert_eq!(c.phase(), InteractionPhase::Ready, "{name}");
        assert_eq!(c.selected().map(|f| f.name()), Some(name));
        assert_eq!(c.outcome(), &Outcome::Empty);
        assert!(c.can_submit());
    }
}

#[test]
fn selecting_the_same_file_twice_is_idempotent() {
    let mut once = controller(FakeClient::ok("{}"));
    once.select_file(mesh("cube.stl"));

    let mut twice = controller(FakeClient::ok("{}"));
    twice.select_file(mesh("cube.stl"));
    twice.select_file(mesh("cube.stl"));

    assert_eq!(once.phase(), twice.phase());
    assert_eq!(once.selected(), twice.selected());
    assert_eq!(once.outcome(), twice.outcome());
}

#[tokio::test]
async fn submit_without_a_file_never_posts() {
    let mut c = controller(FakeClient::ok("{}"));
    c.submit().await;

    assert_eq!(c.client().calls(), 0);
    assert_eq!(error_message(&c), NO_FILE_SELECTED_MESSAGE);
    assert!(!c.is_loading());

    c.select_file(mesh("notes.txt"));
    c.submit().await;
    assert_eq!(c.client().calls(), 0);
    assert_eq!(error_message(&c), NO_FILE_SELECTED_MESSAGE);
}

#[tokio::test]
async fn success_stores_the_report() {
    let mut c = controller(FakeClient::ok(r#"{"a_b": true, "c": 3}"#));
    c.select_file(mesh("cube.stl"));
    c.submit().await;

    assert_eq!(c.phase(), InteractionPhase::Succeeded);
    assert!(!c.is_loading());
    assert!(c.error().is_none());

    let result = c.result().unwrap();
    assert_eq!(result.get("a_b"), Some(&ScalarValue::Bool(true)));
    assert_eq!(result.iter().count(), 2);

    let calls = c.client().calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (url, part) = &calls[0];
    assert_eq!(url, ENDPOINT);
    assert_eq!(part.file_name, "cube.stl");
    assert_eq!(&part.content[..], b"solid cube\nendsolid cube\n");
}

#[tokio::test]
async fn service_detail_is_surfaced() {
    let mut c = controller(FakeClient::new(|| {
        Ok(HttpReply::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            r#"{"detail": "mesh too large"}"#,
        ))
    }));
    c.select_file(mesh("cube.stl"));
    c.submit().await;

    assert_eq!(c.phase(), InteractionPhase::Failed);
    assert!(!c.is_loading());
    assert!(c.result().is_none());
    assert_eq!(c.error().unwrap().kind, ErrorKind::Service);
    assert_eq!(
        error_message(&c),
        "Falha ao analisar o arquivo. Verifique se o backend está rodando e acessível. Detalhe: mesh too large"
    );
}

#[tokio::test]
async fn service_error_falls_back_to_status_text() {
    let mut c = controller(FakeClient::new(|| {
        Ok(HttpReply::new(StatusCode::INTERNAL_SERVER_ERROR, "oops"))
    }));
    c.select_file(mesh("cube.obj"));
    c.submit().await;

    assert!(error_message(&c).ends_with("Detalhe: Internal Server Error"));
}

#[tokio::test]
async fn array_error_body_falls_back_to_status_text() {
    let mut c = controller(FakeClient::new(|| {
        Ok(HttpReply::new(StatusCode::BAD_REQUEST, r#"[{"detail": "x"}]"#))
    }));
    c.select_file(mesh("cube.stl"));
    c.submit().await;

    assert!(error_message(&c).ends_with("Detalhe: Bad Request"));
}

#[tokio::test]
async fn service_error_falls_back_to_status_code() {
    let mut c = controller(FakeClient::new(|| {
        Ok(HttpReply {
            status: StatusCode::BAD_GATEWAY,
            status_text: None,
            body: bytes::Bytes::new(),
        })
    }));
    c.select_file(mesh("cube.obj"));
    c.submit().await;

    assert_eq!(c.phase(), InteractionPhase::Failed);
    assert!(error_message(&c).contains("502"));
}

#[tokio::test]
async fn unreachable_service_reads_failed_to_fetch() {
    let mut c = controller(FakeClient::new(|| {
        Err(TransportFailure::Unreachable(anyhow::anyhow!(
            "tcp connect error: Connection refused (os error 111)"
        )))
    }));
    c.select_file(mesh("cube.stl"));
    c.submit().await;

    assert_eq!(c.phase(), InteractionPhase::Failed);
    assert!(!c.is_loading());
    assert_eq!(c.error().unwrap().kind, ErrorKind::Transport);
    assert!(error_message(&c).ends_with("Detalhe: Failed to fetch"));
}

#[tokio::test]
async fn transport_messages_are_normalized_or_kept() {
    let mut c = controller(FakeClient::new(|| {
        Err(TransportFailure::Other(
            "TypeError: Failed to fetch (proxy)".to_string(),
        ))
    }));
    c.select_file(mesh("cube.stl"));
    c.submit().await;
    assert!(error_message(&c).ends_with("Detalhe: Failed to fetch"));

    let mut c = controller(FakeClient::new(|| {
        Err(TransportFailure::Other("connection reset".to_string()))
    }));
    c.select_file(mesh("cube.stl"));
    c.submit().await;
    assert!(error_message(&c).ends_with("Detalhe: connection reset"));
}

#[tokio::test]
async fn unparseable_success_body_fails_the_attempt() {
    let mut c = controller(FakeClient::ok("<html>not json</html>"));
    c.select_file(mesh("cube.stl"));
    c.submit().await;

    assert_eq!(c.phase(), InteractionPhase::Failed);
    assert_eq!(c.error().unwrap().kind, ErrorKind::Transport);
    assert!(c.result().is_none());
    assert!(!c.is_loading());
}

#[tokio::test]
async fn resubmitting_after_a_failure_clears_the_error() {
    let mut c = controller(FakeClient::new(|| {
        Ok(HttpReply::new(StatusCode::BAD_REQUEST, r#"{"detail": "vazio"}"#))
    }));
    c.select_file(mesh("cube.stl"));
    c.submit().await;
    assert_eq!(c.phase(), InteractionPhase::Failed);

    let submission = c.begin_submit().unwrap();
    assert_eq!(c.phase(), InteractionPhase::Submitting);
    assert!(c.is_loading());
    assert!(!c.can_submit());
    assert_eq!(c.outcome(), &Outcome::Empty);

    c.settle(
        submission.id(),
        Ok(HttpReply::new(StatusCode::OK, r#"{"is_watertight": false}"#)),
    );
    assert_eq!(c.phase(), InteractionPhase::Succeeded);
    assert!(!c.is_loading());
}

#[tokio::test]
async fn a_new_pick_clears_the_previous_report() {
    let mut c = controller(FakeClient::ok(r#"{"faces_count": 12}"#));
    c.select_file(mesh("cube.stl"));
    c.submit().await;
    assert!(c.result().is_some());

    c.select_file(mesh("teapot.obj"));
    assert_eq!(c.phase(), InteractionPhase::Ready);
    assert!(c.result().is_none());
    assert!(c.error().is_none());
}

#[test]
fn only_one_request_in_flight() {
    let mut c = controller(FakeClient::ok("{}"));
    c.select_file(mesh("cube.stl"));

    let first = c.begin_submit().unwrap();
    assert!(c.begin_submit().is_none());
    assert_eq!(c.phase(), InteractionPhase::Submitting);
    assert!(c.error().is_none());

    c.settle(first.id(), Ok(HttpReply::new(StatusCode::OK, "{}")));
    assert!(!c.is_loading());
    assert_eq!(c.phase(), InteractionPhase::Succeeded);
}

#[test]
fn picks_are_ignored_while_submitting() {
    let mut c = controller(FakeClient::ok("{}"));
    c.select_file(mesh("cube.stl"));
    let submission = c.begin_submit().unwrap();

    c.select_file(mesh("teapot.obj"));
    c.select_file(mesh("notes.txt"));
    assert_eq!(c.phase(), InteractionPhase::Submitting);
    assert_eq!(c.selected().map(|f| f.name()), Some("cube.stl"));
    assert!(c.error().is_none());

    c.settle(submission.id(), Ok(HttpReply::new(StatusCode::OK, r#"{"ok": true}"#)));
    assert_eq!(c.phase(), InteractionPhase::Succeeded);
}

#[test]
fn stale_settlements_are_discarded() {
    let mut c = controller(FakeClient::ok("{}"));
    c.select_file(mesh("cube.stl"));

    let first = c.begin_submit().unwrap();
    c.settle(first.id(), Ok(HttpReply::new(StatusCode::OK, r#"{"run": 1}"#)));

    let second = c.begin_submit().unwrap();
    assert_ne!(first.id(), second.id());

    // a late duplicate of the first answer must not touch the second attempt
    c.settle(first.id(), Ok(HttpReply::new(StatusCode::OK, r#"{"run": 99}"#)));
    assert!(c.is_loading());
    assert_eq!(c.phase(), InteractionPhase::Submitting);

    c.settle(second.id(), Ok(HttpReply::new(StatusCode::OK, r#"{"run": 2}"#)));
    assert_eq!(
        c.result().and_then(|r| r.get("run")).map(|v| v.to_string()),
        Some("2".to_string())
    );
}

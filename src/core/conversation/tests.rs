use super::*;
use crate::core::constants::TRANSPORT_FALLBACK_MESSAGE;
use crate::core::message::Sender;
use crate::core::transport::HttpTransport;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Replays queued outcomes in order and records every message it receives.
#[derive(Default)]
struct ScriptedTransport {
    outcomes: Mutex<VecDeque<SubmissionOutcome>>,
    received: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(outcomes: impl IntoIterator<Item = SubmissionOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            received: Mutex::new(Vec::new()),
        })
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send_message(&self, text: &str) -> Result<String, ChatError> {
        self.received.lock().unwrap().push(text.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {text}")))
    }
}

/// Holds every call open until the test releases it.
struct GatedTransport {
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    fn release(&self) {
        self.gate.notify_one();
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for GatedTransport {
    async fn send_message(&self, text: &str) -> Result<String, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(format!("late reply to {text}"))
    }
}

struct PanickingTransport;

#[async_trait]
impl ChatTransport for PanickingTransport {
    async fn send_message(&self, _text: &str) -> Result<String, ChatError> {
        panic!("transport blew up");
    }
}

fn senders(controller: &ConversationController) -> Vec<Sender> {
    controller.transcript().iter().map(|e| e.sender()).collect()
}

fn texts(controller: &ConversationController) -> Vec<String> {
    controller
        .transcript()
        .iter()
        .map(|e| e.text().to_string())
        .collect()
}

#[tokio::test]
async fn successful_submission_appends_user_then_bot() {
    let transport = ScriptedTransport::new([Ok("hi there".to_string())]);
    let mut controller = ConversationController::new(transport.clone());

    let entry = controller.submit_and_wait("hello").await.expect("submitted");
    assert_eq!(entry.sender(), Sender::Bot);
    assert_eq!(entry.text(), "hi there");

    assert_eq!(senders(&controller), vec![Sender::User, Sender::Bot]);
    assert_eq!(texts(&controller), vec!["hello", "hi there"]);
    assert!(!controller.is_pending());
    assert_eq!(controller.last_error(), None);
    assert_eq!(transport.received(), vec!["hello"]);
}

#[tokio::test]
async fn n_submissions_alternate_in_order() {
    let transport = ScriptedTransport::new([]);
    let mut controller = ConversationController::new(transport.clone());

    for prompt in ["one", "two", "three"] {
        controller.submit_and_wait(prompt).await.expect("submitted");
    }

    assert_eq!(controller.transcript().len(), 6);
    assert_eq!(
        texts(&controller),
        vec![
            "one",
            "echo: one",
            "two",
            "echo: two",
            "three",
            "echo: three"
        ]
    );
    assert!(controller
        .transcript()
        .iter()
        .enumerate()
        .all(|(index, entry)| entry.is_user() == (index % 2 == 0)));
    assert!(controller
        .transcript()
        .entries()
        .windows(2)
        .all(|pair| pair[0].timestamp() <= pair[1].timestamp()));
}

#[tokio::test]
async fn blank_input_is_never_sent() {
    let transport = ScriptedTransport::new([]);
    let mut controller = ConversationController::new(transport.clone());

    assert_eq!(controller.submit(""), None);
    assert_eq!(controller.submit("   \n\t "), None);

    controller.set_input("  ");
    assert_eq!(controller.submit_input(), None);
    assert_eq!(controller.input(), "  ");

    assert!(controller.transcript().is_empty());
    assert!(!controller.is_pending());
    tokio::task::yield_now().await;
    assert!(transport.received().is_empty());
    assert!(controller.outcome_rx.try_recv().is_err());
}

#[tokio::test]
async fn user_text_is_trimmed_and_input_cleared() {
    let transport = ScriptedTransport::new([]);
    let mut controller = ConversationController::new(transport.clone());

    controller.set_input("  what's the news?  ");
    controller.submit_input().expect("submitted");

    assert_eq!(controller.input(), "");
    assert_eq!(controller.transcript().entries()[0].text(), "what's the news?");
    controller.resolve_next().await.expect("resolved");
    assert_eq!(transport.received(), vec!["what's the news?"]);
}

#[tokio::test]
async fn second_submit_while_pending_is_ignored() {
    let transport = GatedTransport::new();
    let mut controller = ConversationController::new(transport.clone());

    let first = controller.submit("first").expect("first submission accepted");
    assert!(controller.is_pending());

    controller.set_input("second");
    assert_eq!(controller.submit("second"), None);
    assert_eq!(controller.submit_input(), None);
    assert_eq!(controller.input(), "second");
    assert_eq!(controller.transcript().len(), 1);

    transport.release();
    let (resolved, outcome) = controller.recv_outcome().await.expect("outcome");
    assert_eq!(resolved, first);
    controller.apply_outcome(resolved, outcome);

    assert_eq!(transport.calls(), 1);
    assert_eq!(texts(&controller), vec!["first", "late reply to first"]);
    assert!(!controller.is_pending());
    assert!(controller.outcome_rx.try_recv().is_err());

    // Idle again, so the buffered input goes through now.
    assert!(controller.submit_input().is_some());
    transport.release();
    controller.resolve_next().await.expect("resolved");
    assert_eq!(transport.calls(), 2);
    assert_eq!(controller.transcript().len(), 4);
}

#[tokio::test]
async fn not_found_maps_to_service_unavailable() {
    let transport = ScriptedTransport::new([Err(ChatError::from_status(404))]);
    let mut controller = ConversationController::new(transport);

    let entry = controller.submit_and_wait("x").await.expect("submitted");
    assert!(entry.is_error());
    assert!(entry.text().contains(SERVICE_UNAVAILABLE_MESSAGE));

    assert_eq!(controller.last_error(), Some(SERVICE_UNAVAILABLE_MESSAGE));
    assert_eq!(
        controller.transcript().entries()[1].text(),
        format!("{ERROR_ENTRY_PREFIX}{SERVICE_UNAVAILABLE_MESSAGE}")
    );
    assert!(!controller.is_pending());
}

#[tokio::test]
async fn internal_error_maps_to_server_error_message() {
    let transport = ScriptedTransport::new([Err(ChatError::from_status(500))]);
    let mut controller = ConversationController::new(transport);

    controller.submit_and_wait("x").await.expect("submitted");
    assert_eq!(controller.last_error(), Some(SERVER_ERROR_MESSAGE));
    assert!(controller.transcript().last().unwrap().text().contains(SERVER_ERROR_MESSAGE));
}

#[tokio::test]
async fn other_failures_use_their_own_message() {
    let transport = ScriptedTransport::new([
        Err(ChatError::from_status(503)),
        Err(ChatError::transport("connection refused")),
        Err(ChatError::transport("")),
    ]);
    let mut controller = ConversationController::new(transport);

    controller.submit_and_wait("a").await.expect("submitted");
    assert_eq!(controller.last_error(), Some("API request failed with status 503"));

    controller.submit_and_wait("b").await.expect("submitted");
    assert_eq!(controller.last_error(), Some("connection refused"));

    controller.submit_and_wait("c").await.expect("submitted");
    assert_eq!(controller.last_error(), Some(TRANSPORT_FALLBACK_MESSAGE));

    assert_eq!(controller.transcript().len(), 6);
    assert!(controller
        .transcript()
        .iter()
        .filter(|entry| entry.is_bot())
        .all(|entry| entry.is_error()));
}

#[test]
fn describe_error_follows_error_kind() {
    let not_found = ChatError::from_status(404);
    assert_eq!(not_found.kind(), ChatErrorKind::Status(404));
    assert_eq!(describe_error(&not_found), SERVICE_UNAVAILABLE_MESSAGE);
    assert_eq!(
        describe_error(&ChatError::from_status(500)),
        SERVER_ERROR_MESSAGE
    );
    assert_eq!(
        describe_error(&ChatError::from_status(502)),
        "API request failed with status 502"
    );

    let unreachable = ChatError::transport("");
    assert_eq!(unreachable.kind(), ChatErrorKind::Transport);
    assert_eq!(describe_error(&unreachable), TRANSPORT_FALLBACK_MESSAGE);
}

#[tokio::test]
async fn empty_reply_is_still_a_bot_turn() {
    let transport = ScriptedTransport::new([Ok(String::new())]);
    let mut controller = ConversationController::new(transport);

    let entry = controller.submit_and_wait("ping").await.expect("submitted");
    assert_eq!(entry.text(), "");
    assert!(!entry.is_error());
    assert_eq!(controller.transcript().len(), 2);
    assert_eq!(controller.last_error(), None);
}

#[tokio::test]
async fn next_submission_clears_previous_error() {
    let transport = GatedTransport::new();
    let mut controller = ConversationController::new(transport.clone());

    controller.state.last_error = Some("stale".to_string());
    controller.submit("retry").expect("submitted");
    assert_eq!(controller.last_error(), None);

    transport.release();
    controller.resolve_next().await.expect("resolved");
}

#[tokio::test]
async fn panicking_transport_still_resolves_submission() {
    let mut controller = ConversationController::new(Arc::new(PanickingTransport));

    let entry = controller.submit_and_wait("boom").await.expect("submitted");
    assert!(entry.is_error());
    assert_eq!(controller.last_error(), Some(TRANSPORT_FALLBACK_MESSAGE));
    assert!(!controller.is_pending());
}

#[tokio::test]
async fn dismiss_error_leaves_transcript_alone() {
    let transport = ScriptedTransport::new([Err(ChatError::from_status(404))]);
    let mut controller = ConversationController::new(transport);
    controller.submit_and_wait("x").await.expect("submitted");

    controller.dismiss_error();
    assert_eq!(controller.last_error(), None);
    assert_eq!(controller.transcript().len(), 2);

    let before = serde_json::to_value(controller.state()).unwrap();
    controller.dismiss_error();
    assert_eq!(serde_json::to_value(controller.state()).unwrap(), before);
}

#[tokio::test]
async fn clear_conversation_resets_transcript_and_error() {
    let transport = ScriptedTransport::new([Ok("hi".to_string()), Err(ChatError::from_status(500))]);
    let mut controller = ConversationController::new(transport);
    controller.submit_and_wait("hello").await.expect("submitted");
    controller.submit_and_wait("again").await.expect("submitted");
    assert!(controller.last_error().is_some());

    controller.clear_conversation();
    assert!(controller.transcript().is_empty());
    assert_eq!(controller.last_error(), None);

    controller.clear_conversation();
    assert!(controller.transcript().is_empty());
}

#[tokio::test]
async fn stale_reply_lands_in_cleared_transcript() {
    let transport = GatedTransport::new();
    let mut controller = ConversationController::new(transport.clone());

    controller.submit("before clear").expect("submitted");
    controller.clear_conversation();
    assert!(controller.transcript().is_empty());
    assert!(controller.is_pending());

    transport.release();
    controller.resolve_next().await.expect("resolved");

    assert_eq!(texts(&controller), vec!["late reply to before clear"]);
    assert!(!controller.is_pending());
}

#[tokio::test]
async fn state_serializes_for_inspection() {
    let transport = ScriptedTransport::new([Ok("hi there".to_string())]);
    let mut controller = ConversationController::new(transport);
    controller.submit_and_wait("hello").await.expect("submitted");

    let value = serde_json::to_value(controller.state()).unwrap();
    assert_eq!(value["pending"], json!(false));
    assert_eq!(value["last_error"], json!(null));
    assert_eq!(value["transcript"][0]["sender"], json!("user"));
    assert_eq!(value["transcript"][1]["text"], json!("hi there"));
}

#[tokio::test]
async fn entries_are_written_to_transcript_log() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let log_path = dir.path().join("chat.log");
    let transport = ScriptedTransport::new([Ok("hi there".to_string())]);
    let mut controller = ConversationController::new(transport)
        .with_log(TranscriptLog::create(&log_path).expect("log should open"));

    controller.submit_and_wait("hello").await.expect("submitted");

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents, "You: hello\n\nhi there\n\n");
}

#[tokio::test]
async fn end_to_end_over_http_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "hi there" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = ConversationController::new(Arc::new(HttpTransport::new(&server.uri())));
    controller.submit_and_wait("hello").await.expect("submitted");

    assert_eq!(senders(&controller), vec![Sender::User, Sender::Bot]);
    assert_eq!(texts(&controller), vec!["hello", "hi there"]);
    assert!(!controller.is_pending());
    assert_eq!(controller.last_error(), None);
}

#[tokio::test]
async fn end_to_end_over_http_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "nope" })))
        .mount(&server)
        .await;

    let mut controller = ConversationController::new(Arc::new(HttpTransport::new(&server.uri())));
    controller.submit_and_wait("x").await.expect("submitted");

    let second = &controller.transcript().entries()[1];
    assert!(second.text().contains(SERVICE_UNAVAILABLE_MESSAGE));
    assert_eq!(controller.last_error(), Some(SERVICE_UNAVAILABLE_MESSAGE));
    assert!(!controller.is_pending());
}

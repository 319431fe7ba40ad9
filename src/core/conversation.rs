//! Transcript and submission lifecycle.
//!
//! [`ConversationController`] is the only writer of [`ConversationState`].
//! Each submission moves `Idle -> Pending -> Resolved -> Idle`: [`submit`]
//! appends the user entry and dispatches the transport call on a Tokio task,
//! and [`apply_outcome`] folds the result back in as exactly one bot entry.
//! Outcomes travel over a channel tagged with their [`SubmissionId`] so a
//! caller's event loop can wait on them next to other input.
//!
//! [`submit`]: ConversationController::submit
//! [`apply_outcome`]: ConversationController::apply_outcome

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::constants::{ERROR_ENTRY_PREFIX, SERVER_ERROR_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE};
use crate::core::message::{Transcript, TranscriptEntry};
use crate::core::transport::{ChatError, ChatErrorKind, ChatTransport};
use crate::utils::logging::TranscriptLog;

pub type SubmissionId = u64;

/// Result of one transport call: reply text or a classified failure.
pub type SubmissionOutcome = Result<String, ChatError>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationState {
    transcript: Transcript,
    pending: bool,
    last_error: Option<String>,
    input: String,
}

impl ConversationState {
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Map a transport failure to the text shown to the user.
pub fn describe_error(error: &ChatError) -> String {
    match error.kind() {
        ChatErrorKind::Status(404) => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
        ChatErrorKind::Status(500) => SERVER_ERROR_MESSAGE.to_string(),
        _ => error.message.clone(),
    }
}

pub struct ConversationController {
    state: ConversationState,
    transport: Arc<dyn ChatTransport>,
    outcome_tx: mpsc::UnboundedSender<(SubmissionId, SubmissionOutcome)>,
    outcome_rx: mpsc::UnboundedReceiver<(SubmissionId, SubmissionOutcome)>,
    next_submission_id: SubmissionId,
    log: Option<TranscriptLog>,
}

impl ConversationController {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            state: ConversationState::default(),
            transport,
            outcome_tx,
            outcome_rx,
            next_submission_id: 1,
            log: None,
        }
    }

    pub fn with_log(mut self, log: TranscriptLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn input(&self) -> &str {
        &self.state.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input = text.into();
    }

    /// Submit the input buffer. A rejected submission leaves it untouched.
    pub fn submit_input(&mut self) -> Option<SubmissionId> {
        let input = self.state.input.clone();
        self.submit(&input)
    }

    /// Start a submission and dispatch the transport call.
    ///
    /// Returns `None`, with no state change and no network call, when the
    /// trimmed text is empty or another submission is still pending.
    /// Must be called from within a Tokio runtime.
    pub fn submit(&mut self, text: &str) -> Option<SubmissionId> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty submission");
            return None;
        }
        if self.state.pending {
            debug!("Ignoring submission while a request is in flight");
            return None;
        }

        self.state.last_error = None;
        self.append(TranscriptEntry::user(text));
        self.state.input.clear();
        self.state.pending = true;

        let submission_id = self.next_submission_id;
        self.next_submission_id += 1;
        self.dispatch(submission_id, text.to_string());
        Some(submission_id)
    }

    fn dispatch(&self, submission_id: SubmissionId, text: String) {
        let transport = Arc::clone(&self.transport);
        let tx = self.outcome_tx.clone();
        debug!(submission_id, "Dispatching chat request");

        tokio::spawn(async move {
            // A panicking transport still has to resolve the submission.
            let call = tokio::spawn(async move { transport.send_message(&text).await });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(submission_id, error = %err, "Chat transport task failed");
                    Err(ChatError::transport(String::new()))
                }
            };
            let _ = tx.send((submission_id, outcome));
        });
    }

    /// Wait for the next dispatched call to finish. Cancel-safe.
    pub async fn recv_outcome(&mut self) -> Option<(SubmissionId, SubmissionOutcome)> {
        self.outcome_rx.recv().await
    }

    /// Resolve a submission: append its bot entry and return to idle.
    ///
    /// The entry is appended even if the transcript was cleared while the
    /// request was in flight.
    pub fn apply_outcome(
        &mut self,
        submission_id: SubmissionId,
        outcome: SubmissionOutcome,
    ) -> &TranscriptEntry {
        self.state.pending = false;

        let entry = match outcome {
            Ok(reply) => {
                debug!(submission_id, chars = reply.chars().count(), "Chat request resolved");
                TranscriptEntry::bot(reply)
            }
            Err(error) => {
                let message = describe_error(&error);
                warn!(
                    submission_id,
                    status = ?error.status,
                    error = %error,
                    "Chat request failed"
                );
                self.state.last_error = Some(message.clone());
                TranscriptEntry::bot(format!("{ERROR_ENTRY_PREFIX}{message}"))
            }
        };

        self.append(entry)
    }

    /// Wait for the in-flight submission and apply its outcome.
    pub async fn resolve_next(&mut self) -> Option<&TranscriptEntry> {
        let (submission_id, outcome) = self.outcome_rx.recv().await?;
        Some(self.apply_outcome(submission_id, outcome))
    }

    /// Submit and wait for the resulting bot entry.
    pub async fn submit_and_wait(&mut self, text: &str) -> Option<&TranscriptEntry> {
        self.submit(text)?;
        self.resolve_next().await
    }

    pub fn dismiss_error(&mut self) {
        self.state.last_error = None;
    }

    /// Empty the transcript and clear the error banner. An in-flight request
    /// keeps running.
    pub fn clear_conversation(&mut self) {
        self.state.transcript.clear();
        self.state.last_error = None;
        debug!(pending = self.state.pending, "Conversation cleared");
    }

    fn append(&mut self, entry: TranscriptEntry) -> &TranscriptEntry {
        if let Some(log) = &self.log {
            if let Err(err) = log.log_entry(&entry) {
                warn!(path = %log.path().display(), error = %err, "Failed to write transcript log");
            }
        }
        self.state.transcript.push(entry)
    }
}

#[cfg(test)]
mod tests;

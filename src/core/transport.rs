//! HTTP transport adapter for the chat service.
//!
//! One call performs exactly one request/response exchange and reduces every
//! outcome to either reply text or a classified [`ChatError`]. Retries,
//! timeouts, and caching are left to callers.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{reply_text, service_error, ChatRequest, HealthReport};
use crate::core::constants::TRANSPORT_FALLBACK_MESSAGE;
use crate::utils::url::{construct_api_url, normalize_base_url};

/// The single error shape surfaced by the transport adapter.
///
/// `status` is set when the service answered with a failing HTTP status and
/// unset when the exchange could not complete at all.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ChatError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// The service responded, but with a non-success status.
    Status(u16),
    /// The exchange itself failed (DNS, refused connection, bad body, ...).
    Transport,
}

impl ChatError {
    pub fn from_status(status: u16) -> Self {
        Self {
            message: format!("API request failed with status {status}"),
            status: Some(status),
        }
    }

    /// A transport failure; blank messages fall back to a generic one.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            TRANSPORT_FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            message,
            status: None,
        }
    }

    pub fn kind(&self) -> ChatErrorKind {
        match self.status {
            Some(status) => ChatErrorKind::Status(status),
            None => ChatErrorKind::Transport,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::from_status(status.as_u16()),
            None => Self::transport(err.to_string()),
        }
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one message and return the reply text.
    async fn send_message(&self, text: &str) -> Result<String, ChatError>;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_url(&self) -> String {
        construct_api_url(&self.base_url, "chat")
    }

    pub fn health_url(&self) -> String {
        construct_api_url(&self.base_url, "health")
    }

    /// Query the service's health endpoint.
    pub async fn health(&self) -> Result<HealthReport, ChatError> {
        let health_url = self.health_url();
        debug!(url = %health_url, "Checking chat service health");

        let response = self
            .client
            .get(&health_url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Health check rejected");
            return Err(ChatError::from_status(status.as_u16()));
        }

        Ok(response.json::<HealthReport>().await?)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_message(&self, text: &str) -> Result<String, ChatError> {
        let chat_url = self.chat_url();
        debug!(url = %chat_url, chars = text.chars().count(), "Sending chat message");

        let response = self
            .client
            .post(&chat_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&ChatRequest::new(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Chat request rejected");
            return Err(ChatError::from_status(status.as_u16()));
        }

        let body = response.json::<Value>().await?;
        let reply = reply_text(&body);
        if reply.is_empty() {
            match service_error(&body) {
                Some(detail) => warn!(detail, "Chat service reported an error without a reply"),
                None => debug!("Chat service response carried no reply text"),
            }
        }
        Ok(reply)
    }
}

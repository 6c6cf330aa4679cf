use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::util::{WorkingStatus, truncate_with_suffix};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const KEEP_ALIVE: &str = "5m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    /// The endpoint could not be reached or the exchange broke off mid-response.
    #[error("failed to talk to {url}: {source}. Is Ollama running there?")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Non-success status or a body that is not a chat reply.
    #[error("chat protocol error: {0}")]
    Protocol(String),
}

/// One blocking round trip: system instruction plus history in, assistant reply out.
#[async_trait(?Send)]
pub trait ChatClient {
    async fn chat(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<&'a ChatMessage>,
    stream: bool,
    keep_alive: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

pub struct OllamaClient {
    http: Client,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(cfg: &Config) -> Result<Self, ChatError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ChatError::Network {
                url: cfg.ollama_url.clone(),
                source,
            })?;
        Ok(Self {
            http,
            url: cfg.ollama_url.clone(),
            model: cfg.ollama_model.clone(),
        })
    }
}

#[async_trait(?Send)]
impl ChatClient for OllamaClient {
    async fn chat(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError> {
        let system = ChatMessage::system(system_prompt);
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(&system);
        messages.extend(history);
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            keep_alive: KEEP_ALIVE,
        };

        debug!(
            url = %self.url,
            model = %self.model,
            messages = history.len() + 1,
            "sending chat request"
        );
        let working = WorkingStatus::start("thinking");
        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ChatError::Network {
                url: self.url.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|source| ChatError::Network {
            url: self.url.clone(),
            source,
        })?;
        working.finish();

        if !status.is_success() {
            return Err(ChatError::Protocol(format!(
                "chat endpoint returned {status}: {}",
                truncate_with_suffix(&text, 500, "...")
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ChatError::Protocol(format!("failed to decode chat response: {e}")))?;
        Ok(parsed.message.content)
    }
}

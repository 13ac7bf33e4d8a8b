use std::fmt;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::resources::ResourceGuard;

// Structures matching Ollama's /api/chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool, // We want the full response, not a stream
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    message: ChatMessage,
    // Other fields like created_at, timings, etc., are ignored
}

/// Outcome of asking the general-purpose model. Never an error: the chat
/// loop always gets something displayable, and tests can still match on the
/// kind instead of parsing strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Answer(String),
    OutOfMemory,
    Failed(String),
}

impl fmt::Display for ModelReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelReply::Answer(text) => write!(f, "{}", text),
            ModelReply::OutOfMemory => write!(
                f,
                "❌ Not enough system memory to run the model. \
                 Please close background apps or try a smaller model."
            ),
            ModelReply::Failed(detail) => write!(f, "❌ Error generating response: {}", detail),
        }
    }
}

/// Thin client over the local Ollama chat-completion API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send one conversation to the service and return the assistant's text.
    /// Transport and service errors propagate; `ask` and the form generator
    /// wrap them into their fail-soft replies.
    pub async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let payload = ChatRequest {
            model,
            messages,
            stream: false,
        };

        debug!(model, url = %url, "Sending chat request to Ollama");

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context(format!("Failed to send request to Ollama API at {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %error_body, "Ollama API request failed");
            return Err(anyhow::anyhow!(
                "Ollama API request failed with status {}: {}",
                status,
                error_body
            ));
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse JSON response from Ollama API")?;

        debug!(response = %chat_response.message.content, "Received Ollama response");

        Ok(chat_response.message.content)
    }

    /// Single-turn question with the resource guard checked first. Fail-soft:
    /// an insufficient-memory condition or a transport/service failure comes
    /// back as a displayable reply, never an error.
    pub async fn ask(&self, guard: &ResourceGuard, model: &str, prompt: &str) -> ModelReply {
        if !guard.has_enough_memory() {
            return ModelReply::OutOfMemory;
        }

        let messages = [ChatMessage::user(prompt)];
        match self.chat(model, &messages).await {
            Ok(text) => ModelReply::Answer(text),
            Err(e) => ModelReply::Failed(e.to_string()),
        }
    }
}

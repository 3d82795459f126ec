//! OpenAI-compatible chat-completion client.
//!
//! One request per source file: a fixed system message plus a single user
//! message carrying the prompt and the file contents. The completion
//! capability is a trait so the pipeline can be exercised with a fake client
//! in tests.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";
const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Capability to request one chat completion.
#[allow(async_fn_in_trait)]
pub trait Completion {
    /// Sends a single completion request and returns the raw message content
    /// of the first choice, or the empty string when the response carries no
    /// content.
    async fn complete(&self, model: &str, user_message: &str) -> Result<String>;
}

/// Chat-completion client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a client with the given API key and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_key: String, base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::api(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Completion for OpenAiClient {
    async fn complete(&self, model: &str, user_message: &str) -> Result<String> {
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {url} (model={model})");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::api(format!("status {status}: {text}")));
        }

        let root: Value = serde_json::from_str(&text)?;
        Ok(extract_content(&root))
    }
}

/// Pulls the first choice's message content out of a completion response.
///
/// Absent choices or content yield the empty string rather than an error.
fn extract_content(root: &Value) -> String {
    root.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

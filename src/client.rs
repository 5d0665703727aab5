use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Sampling temperature shared by every chain call site.
pub const CHAT_TEMPERATURE: f32 = 0.1;
/// Output length bound shared by every chain call site.
pub const CHAT_MAX_TOKENS: u32 = 1000;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// The model-call seam. The chain only ever sees this trait; production code
/// uses [`OpenRouterClient`], tests use scripted stubs.
pub trait ChatCompleter {
    fn complete(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, TransportError>;
}

/// Blocking OpenRouter client. One attempt per call; retries, backoff and
/// rate limiting are not this layer's concern.
pub struct OpenRouterClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Whisper-style transcription of an audio file. `response_format=text`
    /// keeps the reply a plain string.
    pub fn transcribe(&self, model: &str, audio_path: &Path) -> Result<String, TransportError> {
        let form = multipart::Form::new()
            .text("model", model.to_string())
            .text("response_format", "text")
            .file("file", audio_path)?;

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Api { status, body });
        }

        let text = response.text()?.trim().to_string();
        if text.is_empty() {
            return Err(TransportError::EmptyCompletion);
        }
        Ok(text)
    }
}

impl ChatCompleter for OpenRouterClient {
    fn complete(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, TransportError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Title", "Relay Translator")
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Api { status, body });
        }

        // Typed response contract: any shape surprise becomes one well-defined
        // transport failure instead of a deep attribute error.
        let parsed: ChatResponse = response
            .json()
            .map_err(|_| TransportError::MalformedResponse("chat completion body"))?;
        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(TransportError::MalformedResponse("empty choices"))?;
        let content = first
            .message
            .content
            .ok_or(TransportError::MalformedResponse("missing content"))?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(TransportError::EmptyCompletion);
        }
        Ok(content)
    }
}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::PipelineError;

/// Default OpenAI transcription endpoint
pub const DEFAULT_TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default transcription model
pub const DEFAULT_MODEL: &str = "whisper-1";

/// Trait for the remote speech-to-text service: one multipart upload of the
/// audio bytes, answered with the transcribed text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        api_key: &str,
    ) -> Result<String, PipelineError>;
}

/// OpenAI Whisper API client
pub struct WhisperClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl WhisperClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

impl Default for WhisperClient {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPTION_URL, DEFAULT_MODEL)
    }
}

#[async_trait]
impl SpeechToText for WhisperClient {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        api_key: &str,
    ) -> Result<String, PipelineError> {
        let audio_part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/mp4")
            .map_err(|e| PipelineError::Client(format!("Failed to build audio part: {}", e)))?;

        let form = Form::new()
            .part("file", audio_part)
            .text("model", self.model.clone());

        tracing::debug!("Uploading {} to transcription endpoint", file_name);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::Client(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| PipelineError::Client(e.to_string()))?;

        extract_text(&body)
    }
}

/// Pull the transcript out of the response body. An OpenAI error payload is
/// surfaced as a client failure instead of an empty-text success.
fn extract_text(body: &Value) -> Result<String, PipelineError> {
    if let Some(text) = body.get("text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    if let Some(message) = body.pointer("/error/message").and_then(Value::as_str) {
        return Err(PipelineError::Client(message.to_string()));
    }

    Err(PipelineError::Client(
        "Transcription response did not contain a text field".to_string(),
    ))
}

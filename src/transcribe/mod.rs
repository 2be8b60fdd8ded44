use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::source::{select_rendition, Rendition, VideoSource, YoutubeSource};
use crate::store::TransientStore;
use crate::utils;
use crate::whisper::{SpeechToText, WhisperClient};
use crate::PipelineError;

pub mod copier;

/// The sole externally observable output shape. Errors travel in-band; the
/// caller always receives a well-formed result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionResult {
    pub is_error: bool,
    pub error_message: String,
    pub text: String,
}

impl TranscriptionResult {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            error_message: String::new(),
            text: text.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            error_message: message.into(),
            text: String::new(),
        }
    }
}

impl From<PipelineError> for TranscriptionResult {
    fn from(err: PipelineError) -> Self {
        Self::error(err.to_string())
    }
}

/// Sequences one transcription job: catalog fetch, rendition selection,
/// streamed download into a transient file, multipart upload, best-effort
/// cleanup. One local file and two outbound calls per request; no retries,
/// no shared state between concurrent jobs beyond the working directory.
pub struct TranscriptionPipeline {
    source: Box<dyn VideoSource>,
    speech: Box<dyn SpeechToText>,
    store: TransientStore,
}

impl TranscriptionPipeline {
    /// Create a pipeline backed by the real YouTube and Whisper clients
    pub fn new(config: &Config) -> Self {
        Self {
            source: Box::new(YoutubeSource::new()),
            speech: Box::new(WhisperClient::new(
                config.whisper.endpoint.clone(),
                config.whisper.model.clone(),
            )),
            store: TransientStore::new(&config.app.data_dir),
        }
    }

    /// Create a pipeline from explicit components
    pub fn with_components(
        source: Box<dyn VideoSource>,
        speech: Box<dyn SpeechToText>,
        store: TransientStore,
    ) -> Self {
        Self {
            source,
            speech,
            store,
        }
    }

    /// Run one job to a terminal state. Every failure mode is mapped into
    /// the uniform result shape here; nothing propagates as a fault.
    pub async fn transcribe_url(&self, url: &str, api_key: &str) -> TranscriptionResult {
        match self.run(url, api_key).await {
            Ok(text) => TranscriptionResult::ok(text),
            Err(err) => {
                tracing::warn!("Transcription failed for {}: {}", url, err);
                TranscriptionResult::from(err)
            }
        }
    }

    async fn run(&self, url: &str, api_key: &str) -> Result<String, PipelineError> {
        let url = utils::validate_url(url).map_err(|e| PipelineError::SourceLookup(e.to_string()))?;

        tracing::info!("Fetching rendition catalog for {}", url);
        let catalog = self.source.fetch_catalog(&url).await?;

        let rendition = select_rendition(&catalog)
            .ok_or(PipelineError::NoAudioFormat)?
            .clone();

        self.store.prepare().await?;
        let path = self.store.allocate(utils::unix_timestamp());

        let outcome = self.download_and_transcribe(&rendition, &path, api_key).await;

        // Cleanup runs on every terminal path; failures stay local.
        self.store.remove(&path).await;

        outcome
    }

    async fn download_and_transcribe(
        &self,
        rendition: &Rendition,
        path: &std::path::Path,
        api_key: &str,
    ) -> Result<String, PipelineError> {
        let stream = self.source.open_stream(rendition).await?;
        let written = copier::drain_to_file(stream, path).await?;
        tracing::debug!("Downloaded {} bytes to {}", written, path.display());

        let audio = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::Stream(e.to_string()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp4".to_string());

        self.speech.transcribe(audio, &file_name, api_key).await
    }
}

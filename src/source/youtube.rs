use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use super::{AudioStream, Rendition, RenditionCatalog, VideoSource};
use crate::PipelineError;

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";

// The Android client receives directly playable stream URLs, so no signature
// deciphering is needed.
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "19.09.37";
const ANDROID_SDK_VERSION: u32 = 30;

/// YouTube rendition catalog and stream source backed by the Innertube
/// player endpoint.
pub struct YoutubeSource {
    client: Client,
}

impl YoutubeSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Query the player endpoint for the video's streaming data
    async fn get_player_response(&self, video_id: &str) -> Result<Value, PipelineError> {
        tracing::debug!("Fetching player response for video: {}", video_id);

        let body = json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                    "androidSdkVersion": ANDROID_SDK_VERSION,
                    "hl": "en",
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(PLAYER_ENDPOINT)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::SourceLookup(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::SourceLookup(format!(
                "Player endpoint returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| PipelineError::SourceLookup(e.to_string()))
    }
}

impl Default for YoutubeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSource for YoutubeSource {
    async fn fetch_catalog(&self, url: &str) -> Result<RenditionCatalog, PipelineError> {
        let video_id = extract_video_id(url)?;
        let info = self.get_player_response(&video_id).await?;

        let status = info["playabilityStatus"]["status"].as_str().unwrap_or("UNKNOWN");
        if status != "OK" {
            let reason = info["playabilityStatus"]["reason"]
                .as_str()
                .unwrap_or("video is not playable");
            return Err(PipelineError::SourceLookup(format!(
                "Video unavailable ({}): {}",
                status, reason
            )));
        }

        let formats = info["streamingData"]["adaptiveFormats"]
            .as_array()
            .ok_or_else(|| {
                PipelineError::SourceLookup("No streaming data in player response".to_string())
            })?;

        let catalog: RenditionCatalog = formats.iter().filter_map(parse_rendition).collect();

        tracing::debug!("Catalog contains {} renditions", catalog.len());
        Ok(catalog)
    }

    async fn open_stream(&self, rendition: &Rendition) -> Result<AudioStream, PipelineError> {
        let response = self
            .client
            .get(&rendition.url)
            .send()
            .await
            .map_err(|e| PipelineError::Stream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Stream(format!(
                "Failed to download audio: HTTP {}",
                response.status()
            )));
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| PipelineError::Stream(e.to_string())));

        Ok(Box::pin(stream))
    }
}

/// Extract the 11-character video id from the common YouTube URL shapes
pub fn extract_video_id(url: &str) -> Result<String, PipelineError> {
    let parsed = Url::parse(url)
        .map_err(|_| PipelineError::SourceLookup(format!("Invalid URL format: {}", url)))?;

    let host = parsed.host_str().unwrap_or("");
    let host = host.strip_prefix("www.").unwrap_or(host);

    let id = match host {
        "youtu.be" => parsed.path_segments().and_then(|mut segments| segments.next().map(String::from)),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let mut segments = parsed.path_segments().into_iter().flatten();
            match segments.next() {
                Some("watch") => parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("embed") | Some("shorts") | Some("v") => segments.next().map(String::from),
                _ => None,
            }
        }
        _ => None,
    };

    id.filter(|id| !id.is_empty())
        .ok_or_else(|| PipelineError::SourceLookup(format!("Not a recognized youtube url: {}", url)))
}

/// Map one adaptive format entry onto a `Rendition`. Entries without a
/// direct URL (cipher-protected) are skipped.
fn parse_rendition(format: &Value) -> Option<Rendition> {
    let url = format["url"].as_str()?.to_string();
    let mime_type = format["mimeType"].as_str().unwrap_or("");

    let container = mime_type
        .split(';')
        .next()
        .and_then(|media| media.split('/').nth(1))
        .unwrap_or("")
        .to_string();

    let audio_quality = format["audioQuality"].as_str().map(|q| q.to_string());
    let has_audio = audio_quality.is_some() || mime_type.starts_with("audio/");

    // Advertised bitrate is bits per second; renditions without an audio
    // track get no audio bitrate at all.
    let audio_bitrate = if has_audio {
        format["bitrate"].as_u64().map(|b| (b / 1000) as u32)
    } else {
        None
    };

    Some(Rendition {
        url,
        itag: format["itag"].as_i64(),
        audio_quality,
        has_audio,
        container,
        audio_bitrate,
        content_length: format["contentLength"]
            .as_str()
            .and_then(|len| len.parse().ok()),
    })
}

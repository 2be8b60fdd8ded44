use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

pub mod youtube;

pub use youtube::YoutubeSource;

use crate::PipelineError;

/// Audio quality tier required for selection (YouTube's middle tier).
pub const TARGET_AUDIO_QUALITY: &str = "AUDIO_QUALITY_MEDIUM";

/// Container format required for selection.
pub const TARGET_CONTAINER: &str = "mp4";

/// One selectable encoding of a source video, as advertised by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rendition {
    /// Direct download URL for this rendition
    pub url: String,

    /// Platform format identifier, if advertised
    pub itag: Option<i64>,

    /// Audio quality tier (e.g. "AUDIO_QUALITY_MEDIUM"), absent on video-only
    /// renditions
    pub audio_quality: Option<String>,

    /// Whether the rendition carries an audio track
    pub has_audio: bool,

    /// Container format parsed from the MIME type (mp4, webm, ...)
    pub container: String,

    /// Audio bitrate in kbit/s, absent on video-only renditions
    pub audio_bitrate: Option<u32>,

    /// Content length in bytes if advertised
    pub content_length: Option<u64>,
}

/// Ordered collection of renditions advertised for one video. Produced once
/// per request and discarded after selection.
pub type RenditionCatalog = Vec<Rendition>;

/// Fallible stream of downloaded audio chunks.
pub type AudioStream = BoxStream<'static, std::result::Result<Bytes, PipelineError>>;

/// Picks the one rendition to download: the first catalog entry (in catalog
/// order) with medium audio quality, an audio track, an mp4 container and a
/// positive audio bitrate. `None` is a legitimate terminal outcome, not a
/// fault.
pub fn select_rendition(catalog: &[Rendition]) -> Option<&Rendition> {
    catalog.iter().find(|r| {
        r.audio_quality.as_deref() == Some(TARGET_AUDIO_QUALITY)
            && r.has_audio
            && r.container == TARGET_CONTAINER
            && r.audio_bitrate.map_or(false, |bitrate| bitrate > 0)
    })
}

/// Trait for the video platform: supplies the rendition catalog for a URL
/// and, once a rendition is selected, a readable byte stream of its content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch the catalog of available renditions for a video URL
    async fn fetch_catalog(&self, url: &str) -> std::result::Result<RenditionCatalog, PipelineError>;

    /// Open a byte stream for the selected rendition's content
    async fn open_stream(&self, rendition: &Rendition) -> std::result::Result<AudioStream, PipelineError>;
}

//! yt-whisper - A Rust CLI tool for transcribing YouTube videos
//!
//! This library downloads the audio-only rendition of a YouTube video to a
//! transient local file and forwards it to the OpenAI Whisper API, returning
//! the transcribed text or a uniform error shape.

pub mod cli;
pub mod config;
pub mod source;
pub mod store;
pub mod transcribe;
pub mod utils;
pub mod whisper;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use source::{Rendition, RenditionCatalog, VideoSource};
pub use transcribe::{TranscriptionPipeline, TranscriptionResult};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error taxonomy for the transcription pipeline. Every variant is converted
/// into the uniform `TranscriptionResult` shape at the orchestrator boundary;
/// the display text is what the caller sees in `errorMessage`.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// No catalog entry satisfied the audio selection predicate. The message
    /// is fixed and part of the external contract.
    #[error("No audio format available for provided youtube url.")]
    NoAudioFormat,

    /// The rendition catalog lookup itself failed (bad URL, unplayable video,
    /// player endpoint unreachable).
    #[error("{0}")]
    SourceLookup(String),

    /// Download-side transport or file error. Invalidates the whole job.
    #[error("{0}")]
    Stream(String),

    /// The transcription call failed or returned an unusable body.
    #[error("{0}")]
    Client(String),
}

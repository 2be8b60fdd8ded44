use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-whisper",
    about = "yt-whisper - Transcribe YouTube videos using the OpenAI Whisper API",
    version,
    long_about = "A CLI tool that downloads the audio-only rendition of a YouTube video and sends it to the OpenAI Whisper API for speech-to-text conversion. The result is printed as JSON: {\"isError\", \"errorMessage\", \"text\"}."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe audio from a YouTube URL
    Transcribe {
        /// YouTube video URL
        #[arg(value_name = "URL")]
        url: String,

        /// OpenAI API key, forwarded verbatim as a bearer credential
        #[arg(long, env = "OPENAI_API_KEY", value_name = "KEY", hide_env_values = true)]
        api_key: String,

        /// Working directory for transient downloads (overrides config)
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Show or initialize configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

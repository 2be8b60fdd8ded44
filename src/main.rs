use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_whisper::{Cli, Commands, Config, TranscriptionPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "yt_whisper=debug"
    } else {
        "yt_whisper=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load().await?;

    match cli.command {
        Commands::Transcribe { url, api_key, data_dir } => {
            if let Some(dir) = data_dir {
                config.app.data_dir = dir;
            }

            let pipeline = TranscriptionPipeline::new(&config);

            tracing::info!("Starting transcription for URL: {}", url);
            let result = pipeline.transcribe_url(&url, &api_key).await;

            // Errors travel in-band; the process still exits cleanly.
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.save().await?;
                println!("Configuration written. Edit it at your config directory or ./config.yaml");
            }
        }
    }

    Ok(())
}

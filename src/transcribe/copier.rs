use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::source::AudioStream;
use crate::PipelineError;

/// Drain a remote byte stream into a local file, writing chunks in arrival
/// order. Completion is the stream's own end; a stream error aborts the copy
/// with no further writes. The file handle is scoped to this function, so it
/// is released on both paths.
pub async fn drain_to_file(mut stream: AudioStream, path: &Path) -> Result<u64, PipelineError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| PipelineError::Stream(format!("Failed to create {}: {}", path.display(), e)))?;

    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| PipelineError::Stream(e.to_string()))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| PipelineError::Stream(e.to_string()))?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures_util::stream;

    fn chunk_stream(chunks: Vec<Result<Bytes, PipelineError>>) -> AudioStream {
        Box::pin(stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_copies_chunks_in_arrival_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp4");

        let stream = chunk_stream(vec![
            Ok(Bytes::from_static(b"first ")),
            Ok(Bytes::from_static(b"second ")),
            Ok(Bytes::from_static(b"third")),
        ]);

        let written = drain_to_file(stream, &path).await.unwrap();
        assert_eq!(written, 18);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"first second third");
    }

    #[tokio::test]
    async fn test_empty_stream_produces_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp4");

        let written = drain_to_file(chunk_stream(vec![]), &path).await.unwrap();
        assert_eq!(written, 0);
        assert!(tokio::fs::read(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_aborts_without_further_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.mp4");

        let stream = chunk_stream(vec![
            Ok(Bytes::from_static(b"kept")),
            Err(PipelineError::Stream("connection reset".to_string())),
            Ok(Bytes::from_static(b"never written")),
        ]);

        let err = drain_to_file(stream, &path).await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"kept");
    }
}

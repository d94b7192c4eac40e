use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::config::TranscriptionConfig;
use crate::error::ServiceError;

/// One timed span of the accurate transcript. Spans are ordered,
/// non-overlapping, and cover the whole recording.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct WhisperTranscript {
    pub segments: Vec<TranscriptSegment>,
}

impl WhisperTranscript {
    pub fn from_json(raw: &str) -> Result<Self, ServiceError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let segments = value
            .get("segments")
            .ok_or(ServiceError::MissingField("segments"))?;
        let segments: Vec<TranscriptSegment> = serde_json::from_value(segments.clone())?;
        Ok(Self { segments })
    }
}

pub struct WhisperClient {
    client: reqwest::Client,
    config: TranscriptionConfig,
}

impl WhisperClient {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Uploads the audio and returns the verbose_json body for caching.
    pub async fn transcribe(&self, audio: &Path) -> Result<String> {
        let url = format!(
            "{}/v1/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        );
        let audio_bytes = std::fs::read(audio)
            .with_context(|| format!("Failed to read audio file {:?}", audio))?;
        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let part = reqwest::multipart::Part::bytes(audio_bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(ServiceError::Transport)?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json")
            .part("file", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: "whisper",
                status,
                body,
            }
            .into());
        }

        Ok(response.text().await.map_err(ServiceError::Transport)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segments_from_verbose_json() {
        let raw = r#"{
            "task": "transcribe",
            "duration": 9.8,
            "text": "full text here",
            "segments": [
                {"id": 0, "start": 0.0, "end": 4.2, "text": " full text", "no_speech_prob": 0.01},
                {"id": 1, "start": 4.2, "end": 9.8, "text": " here", "no_speech_prob": 0.02}
            ]
        }"#;
        let transcript = WhisperTranscript::from_json(raw).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].end, 4.2);
        assert_eq!(transcript.segments[1].text, " here");
    }

    #[test]
    fn missing_segments_is_a_tagged_error() {
        let err = WhisperTranscript::from_json(r#"{"text": "no spans"}"#).unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("segments")));
    }
}

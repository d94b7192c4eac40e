use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::config::DiarizationConfig;
use crate::error::ServiceError;

/// Per-word speaker label from the diarization response.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerLabel {
    pub speaker: u32,
    pub from: f64,
    pub to: f64,
    pub confidence: f64,
}

/// The slice of the Watson response this pipeline consumes. The raw JSON is
/// cached verbatim; only `speaker_labels` is ever parsed out of it.
#[derive(Debug, Clone)]
pub struct DiarizationResult {
    pub speaker_labels: Vec<SpeakerLabel>,
}

impl DiarizationResult {
    pub fn from_json(raw: &str) -> Result<Self, ServiceError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let labels = value
            .get("speaker_labels")
            .ok_or(ServiceError::MissingField("speaker_labels"))?;
        let speaker_labels: Vec<SpeakerLabel> = serde_json::from_value(labels.clone())?;
        Ok(Self { speaker_labels })
    }
}

pub struct WatsonClient {
    client: reqwest::Client,
    config: DiarizationConfig,
}

impl WatsonClient {
    pub fn new(config: DiarizationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Runs one recognize call with word timestamps and speaker labels
    /// enabled and returns the raw JSON body for caching.
    pub async fn recognize(&self, audio: &Path) -> Result<String> {
        let url = format!(
            "{}/v1/recognize",
            self.config.service_url.trim_end_matches('/')
        );
        let audio_bytes = std::fs::read(audio)
            .with_context(|| format!("Failed to read audio file {:?}", audio))?;

        log::debug!("posting {} bytes to {}", audio_bytes.len(), url);

        let response = self
            .client
            .post(&url)
            .basic_auth("apikey", Some(&self.config.api_key))
            .header("Content-Type", "audio/mp3")
            .query(&[
                ("model", self.config.model.as_str()),
                ("timestamps", "true"),
                ("speaker_labels", "true"),
            ])
            .body(audio_bytes)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: "watson",
                status,
                body,
            }
            .into());
        }

        Ok(response.text().await.map_err(ServiceError::Transport)?)
    }
}

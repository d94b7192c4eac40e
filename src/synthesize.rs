use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde_json::json;
use std::io::Read;
use std::path::Path;

use crate::config::SynthesisConfig;
use crate::error::ServiceError;

/// One line of the script: the identifier names the output file, the text
/// goes to the synthesis API. The second column of the source file is
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRow {
    pub id: String,
    pub text: String,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open script file {:?}", path))?;
    read_script(file)
}

/// Rows whose third column is absent or empty are dropped here, before any
/// network call is made for them.
pub fn read_script<R: Read>(reader: R) -> Result<Vec<ScriptRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("Failed to parse script row")?;
        let text = record.get(2).unwrap_or("");
        if text.is_empty() {
            continue;
        }
        rows.push(ScriptRow {
            id: record.get(0).unwrap_or("").to_string(),
            text: text.to_string(),
        });
    }

    Ok(rows)
}

pub struct SynthesisClient {
    client: reqwest::Client,
    config: SynthesisConfig,
}

impl SynthesisClient {
    pub fn new(config: SynthesisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Posts one line of text to the voice endpoint and returns the audio
    /// bytes on HTTP 200.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        );
        let body = json!({ "text": text });

        let response = self
            .client
            .post(&url)
            .header("accept", "audio/mpeg")
            .header("xi-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: "synthesis",
                status,
                body,
            }
            .into());
        }

        Ok(response.bytes().await.map_err(ServiceError::Transport)?.to_vec())
    }
}

/// Runs the whole voice-generation pipeline: one synthesis call and one file
/// write per usable row. A failed row is reported and skipped; the loop
/// never retries and never aborts.
pub async fn run_synthesis(
    config: &SynthesisConfig,
    rows: &[ScriptRow],
    out_dir: &Path,
    pb: &ProgressBar,
) -> Result<()> {
    let client = SynthesisClient::new(config.clone());

    for row in rows {
        match client.synthesize(&row.text).await {
            Ok(audio) => {
                let filename = format!("{}-{}.mp3", row.id, config.voice_name);
                let out_path = out_dir.join(&filename);
                std::fs::write(&out_path, &audio)
                    .with_context(|| format!("Failed to write audio file {:?}", out_path))?;
                pb.println(format!("File saved as {}", filename));
            }
            Err(e) => {
                log::warn!("synthesis failed for row {}: {}", row.id, e);
                pb.println(format!("Request failed for row {}: {}", row.id, e));
            }
        }
        pb.inc(1);
    }

    Ok(())
}

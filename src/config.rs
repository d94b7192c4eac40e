use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub synthesis: SynthesisConfig,
    pub diarization: DiarizationConfig,
    pub transcription: TranscriptionConfig,
    pub review: ReviewConfig,
    /// Display names for diarized speaker ids; anything absent renders as
    /// "Speaker <id>".
    #[serde(default = "default_speakers")]
    pub speakers: HashMap<u32, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SynthesisConfig {
    #[serde(default = "default_synthesis_url")]
    pub base_url: String,
    pub voice_id: String,
    pub api_key: String,
    /// Suffix for generated audio files: "<row id>-<voice_name>.mp3".
    #[serde(default = "default_voice_name")]
    pub voice_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiarizationConfig {
    /// Instance-specific Watson service URL, including the instance path.
    pub service_url: String,
    pub api_key: String,
    #[serde(default = "default_diarization_model")]
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranscriptionConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReviewConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_review_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_speakers() -> HashMap<u32, String> {
    HashMap::from([(0, "Brett".to_string()), (1, "Victor".to_string())])
}

fn default_synthesis_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_voice_name() -> String {
    "Victor".to_string()
}

fn default_diarization_model() -> String {
    "en-US_BroadbandModel".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_review_model() -> String {
    "gpt-4-1106-preview".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

pub fn load_app_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(".podscribe/config.yaml")
        }
    };

    if !config_path.exists() {
        anyhow::bail!("Config file not found at {:?}", config_path);
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config at {:?}", config_path))?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

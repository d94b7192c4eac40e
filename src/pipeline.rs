use anyhow::{Context, Result};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use crate::cache::{CacheStore, FsCache};
use crate::config::AppConfig;
use crate::llm::LlmClient;
use crate::merge;
use crate::output;
use crate::review;
use crate::transcribe::watson::{DiarizationResult, WatsonClient};
use crate::transcribe::whisper::{WhisperClient, WhisperTranscript};

/// Returns the cached payload for `key` when one exists, otherwise runs the
/// fetch once and stores its result. A rerun against a warm cache therefore
/// issues no network call for this step.
pub async fn fetch_cached<C, F, Fut>(cache: &C, key: &str, fetch: F) -> Result<String>
where
    C: CacheStore + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    if let Some(cached) = cache.load(key)? {
        return Ok(cached);
    }

    let raw = fetch().await?;
    cache.store(key, &raw)?;
    Ok(raw)
}

/// Everything the merge stages produce for one episode.
pub struct TranscriptArtifacts {
    pub speakers_json: String,
    pub merged_json: String,
    pub readable: String,
}

/// The deterministic middle of the pipeline: raw service responses in,
/// intermediate artifacts out. No I/O, so identical inputs always produce
/// byte-identical outputs.
pub fn build_transcripts(
    watson_raw: &str,
    whisper_raw: &str,
    speakers: &HashMap<u32, String>,
) -> Result<TranscriptArtifacts> {
    let diarization = DiarizationResult::from_json(watson_raw)
        .context("Failed to parse diarization response")?;
    let transcript = WhisperTranscript::from_json(whisper_raw)
        .context("Failed to parse transcription response")?;

    let fragments = merge::extract_fragments(&diarization.speaker_labels);
    let merged = merge::merge_transcripts(&fragments, &transcript.segments);
    let consolidated = merge::consolidate(&merged);
    let readable = output::render_readable(&consolidated, speakers);

    Ok(TranscriptArtifacts {
        speakers_json: serde_json::to_string_pretty(&fragments)?,
        merged_json: serde_json::to_string_pretty(&merged)?,
        readable,
    })
}

/// Runs the full transcription pipeline for one audio file, writing every
/// intermediate and final artifact next to it.
pub async fn process_transcription(audio: &Path, config: &AppConfig) -> Result<()> {
    let audio = audio.canonicalize().context("Failed to find audio file")?;
    let base = audio
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Audio file has no usable name")?
        .to_string();
    let parent = audio.parent().context("Audio file has no parent directory")?;
    let cache = FsCache::new(parent.to_path_buf());

    println!("Using Watson to transcribe audio and identify speakers...");
    let watson = WatsonClient::new(config.diarization.clone());
    let watson_raw = fetch_cached(&cache, &format!("{base}_watson_transcript.json"), || {
        watson.recognize(&audio)
    })
    .await?;

    println!("Using Whisper to transcribe audio more accurately...");
    let whisper = WhisperClient::new(config.transcription.clone());
    let whisper_raw = fetch_cached(&cache, &format!("{base}_whisper_transcript.json"), || {
        whisper.transcribe(&audio)
    })
    .await?;

    println!("Merging transcripts...");
    let artifacts = build_transcripts(&watson_raw, &whisper_raw, &config.speakers)?;
    output::save_text(
        &parent.join(format!("{base}_watson_speakers.json")),
        &artifacts.speakers_json,
    )?;
    output::save_text(
        &parent.join(format!("{base}_merged_transcript.json")),
        &artifacts.merged_json,
    )?;

    println!("Making the transcript human-readable...");
    output::save_text(
        &parent.join(format!("{base}_readable_transcript.txt")),
        &artifacts.readable,
    )?;

    println!("Sending transcript for speaker attribution review...");
    let llm = LlmClient::new(config.review.clone());
    let refined = review::refine_transcript(&llm, &artifacts.readable).await?;
    output::save_text(
        &parent.join(format!("{base}_refined_transcript.txt")),
        &refined,
    )?;

    println!("Transcripts saved for {base}");
    Ok(())
}

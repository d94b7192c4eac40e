use anyhow::{Context, Result};
use std::path::PathBuf;

/// Key-value store for raw service responses, keyed by output file name.
///
/// Deliberately has no expiry and no integrity check: whatever payload is
/// present for a key is trusted and returned, even if it came from a
/// truncated write. Inputs are assumed immutable per episode, so a rerun
/// that finds a cached response skips the network entirely.
pub trait CacheStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn store(&self, key: &str, payload: &str) -> Result<()>;
}

/// Filesystem-backed store; keys become file names inside `dir`.
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl CacheStore for FsCache {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            log::debug!("cache miss for {}", key);
            return Ok(None);
        }
        log::debug!("cache hit for {}", key);
        let payload = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cached file {:?}", path))?;
        Ok(Some(payload))
    }

    fn store(&self, key: &str, payload: &str) -> Result<()> {
        let path = self.path_for(key);
        std::fs::write(&path, payload)
            .with_context(|| format!("Failed to write cache file {:?}", path))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_none_for_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path().to_path_buf());
        assert!(cache.load("episode_watson_transcript.json").unwrap().is_none());
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path().to_path_buf());
        cache
            .store("episode_whisper_transcript.json", r#"{"segments": []}"#)
            .unwrap();
        let payload = cache.load("episode_whisper_transcript.json").unwrap();
        assert_eq!(payload.as_deref(), Some(r#"{"segments": []}"#));
    }

    #[test]
    fn stale_payload_is_trusted_as_is() {
        // No integrity check: a truncated or hand-edited file is returned
        // verbatim rather than refetched.
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join("episode_watson_transcript.json"), "{\"trunc").unwrap();
        let payload = cache.load("episode_watson_transcript.json").unwrap();
        assert_eq!(payload.as_deref(), Some("{\"trunc"));
    }
}

use anyhow::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::merge::ConsolidatedEntry;

/// Renders "<name>: <text>" lines, one per consolidated turn, each
/// newline-terminated. Ids absent from the name table fall back to
/// "Speaker <id>".
pub fn render_readable(entries: &[ConsolidatedEntry], names: &HashMap<u32, String>) -> String {
    let mut readable = String::new();

    for entry in entries {
        let name = names
            .get(&entry.speaker)
            .cloned()
            .unwrap_or_else(|| format!("Speaker {}", entry.speaker));
        readable.push_str(&format!("{}: {}\n", name, entry.text));
    }

    readable
}

pub fn save_text(path: &Path, text: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

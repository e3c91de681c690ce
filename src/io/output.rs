use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{ReformattedTranscript, attribute_speakers};

/// Render a delimited transcript as one `Speaker: text` line per utterance
pub fn render_dialogue(transcript: &str, starts_with_doctor: bool) -> String {
    let mut output = String::new();
    for utterance in attribute_speakers(transcript, starts_with_doctor) {
        output.push_str(&format!("{}: {}\n", utterance.speaker, utterance.text));
    }
    output
}

/// Write the reformatted transcript as pretty JSON
pub fn write_reformatted(reformatted: &ReformattedTranscript, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(reformatted)
        .context("Failed to serialize reformatted transcript")?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write output file: {:?}", path))?;
    Ok(())
}

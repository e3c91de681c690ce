use std::path::Path;

use anyhow::{Context, Result, bail};

/// Read a raw conversation from a text file
///
/// Line breaks are folded into single spaces; the reformatter decides where
/// the speaker changes.
pub fn read_conversation_file(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let conversation = normalize_conversation(&content);
    if conversation.is_empty() {
        bail!("Conversation file is empty: {:?}", path);
    }
    Ok(conversation)
}

/// Collapse all whitespace runs into single spaces
pub fn normalize_conversation(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Batch file loading.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use contracts::Message;

/// Accepted batch file layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    /// Queue event as delivered to the function runtime
    Queue {
        #[serde(rename = "Records")]
        records: Vec<QueueRecord>,
    },
    /// Plain list of messages
    Messages(Vec<Message>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueRecord {
    message_id: String,
    #[serde(default)]
    body: String,
}

/// Parse batch file content
pub fn parse_batch(content: &str) -> Result<Vec<Message>> {
    let file: BatchFile = serde_json::from_str(content)
        .context("Batch file must be a JSON array of {id, body} or an object with \"Records\"")?;

    Ok(match file {
        BatchFile::Queue { records } => records
            .into_iter()
            .map(|r| Message::new(r.message_id, r.body))
            .collect(),
        BatchFile::Messages(messages) => messages,
    })
}

/// Read and parse a batch file
pub fn load_batch(path: &Path) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    parse_batch(&content).with_context(|| format!("Invalid batch file {}", path.display()))
}

//! State documents
//!
//! Configuration and state records are read from JSON or YAML files (or
//! stdin with `-`) and written back as JSON.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Parse document text, YAML when `yaml` is set and JSON otherwise
pub fn parse_document(content: &str, yaml: bool) -> Result<Value> {
    if yaml {
        serde_yaml::from_str(content).context("Failed to parse YAML document")
    } else {
        serde_json::from_str(content).context("Failed to parse JSON document")
    }
}

/// Read a document from a file, or stdin for `-`
pub fn read_document(path: &Path) -> Result<Value> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read document from stdin")?;
        let trimmed = content.trim_start();
        return parse_document(&content, !trimmed.starts_with('{') && !trimmed.starts_with('['));
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {:?}", path))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_document(&content, yaml)
}

/// Render a state document for output
pub fn render_state(state: &Value) -> Result<String> {
    serde_json::to_string_pretty(state).context("Failed to render state")
}

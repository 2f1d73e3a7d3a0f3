//! Layer Document Codec
//!
//! A document is the `config.json` file inside a layer directory. On disk it
//! is always a single JSON object; anything else is reported as corrupt.

use std::fs;
use std::path::Path;

use log::warn;
use serde_json::Value;

use crate::error::{LayerError, Result};

/// File name of the document stored in every layer directory.
pub const DOCUMENT_FILE: &str = "config.json";

/// The in-memory form of a layer document.
pub type Document = serde_json::Map<String, Value>;

/// Parse document text, rejecting anything that is not a JSON object.
pub fn parse(path: &Path, content: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(content).map_err(|e| {
        warn!("Corrupt document {}: {}", path.display(), e);
        LayerError::CorruptDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => {
            warn!("Document {} is not a JSON object", path.display());
            Err(LayerError::CorruptDocument {
                path: path.to_path_buf(),
                reason: format!("expected a JSON object, found {}", type_name(&other)),
            })
        }
    }
}

/// Read and parse the document at `path`.
pub fn load(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| LayerError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(path, &content)
}

/// Serialize `document` and replace the contents of `path` with it.
pub fn save(path: &Path, document: &Document) -> Result<()> {
    let content = serde_json::to_string(document)?;

    fs::write(path, content).map_err(|e| LayerError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

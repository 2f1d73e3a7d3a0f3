//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use log::info;
use serde_json::Value;

use crate::document::Document;
use crate::error::{LayerError, Result};
use crate::store::{InitOptions, LayerStore};

/// Interpret command-line text as JSON, falling back to a plain string.
pub fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Parse the `--document` argument, which must be a JSON object.
fn parse_document_arg(text: &str) -> Result<Document> {
    let reason = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => "expected a JSON object".to_string(),
        Err(e) => e.to_string(),
    };

    Err(LayerError::InvalidArgument {
        name: "--document".to_string(),
        reason,
    })
}

/// Create a layer.
pub fn init(
    store: &LayerStore,
    layer: &str,
    initial: Option<&str>,
    no_document: bool,
    reset: bool,
) -> Result<()> {
    info!("Initializing layer '{}' under {}", layer, store.root().display());

    let mut options = InitOptions::new().with_reset(reset);
    if no_document {
        options = options.without_document();
    }
    if let Some(text) = initial {
        options = options.with_document(parse_document_arg(text)?);
    }

    store.init_layer(layer, options)?;
    println!("Layer ready: {}", store.layer_dir(layer, false)?.display());

    Ok(())
}

/// Print the value of a key.
pub fn get(store: &LayerStore, layer: &str, key: &str, default: Option<&str>) -> Result<()> {
    let value = store.get_value(layer, key, default.map(parse_value))?;
    println!("{}", value);
    Ok(())
}

/// Set the value of a key.
pub fn set(store: &LayerStore, layer: &str, key: &str, value: &str) -> Result<()> {
    store.set_value(layer, key, parse_value(value))
}

/// Print a layer's document.
pub fn show(store: &LayerStore, layer: &str) -> Result<()> {
    let document = store.read_document(layer)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// Print a layer's directory.
pub fn dir(store: &LayerStore, layer: &str, no_check: bool) -> Result<()> {
    println!("{}", store.layer_dir(layer, !no_check)?.display());
    Ok(())
}

/// List sub-layers of the root, or of `layer` when given.
pub fn list(store: &LayerStore, layer: Option<&str>) -> Result<()> {
    let sublayers = match layer {
        Some(layer) => store.sublayer(layer)?.list_sublayers()?,
        None => store.list_sublayers()?,
    };

    for name in sublayers {
        println!("{}", name);
    }

    Ok(())
}

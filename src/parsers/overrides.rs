//! Override files.
//!
//! `<overrides>/<lang>.json` maps a `Kind.field` context to entity ids and
//! their forced translation. The `"*"` key of a context holds context-free
//! texts:
//!
//! ```json
//! { "Location.name": { "1": "Route Un", "*": ["Route"] } }
//! ```
//!
//! Messages are returned in file order; callers sort them before merging.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::{Message, Origin, data::split_context};

pub const CONTEXT_FREE_KEY: &str = "*";
pub const OVERRIDE_EXTENSION: &str = "json";

pub fn override_path(root: &Path, language: &str) -> PathBuf {
    root.join(format!("{}.{}", language, OVERRIDE_EXTENSION))
}

/// Parse an override file for `language`.
pub fn parse_overrides(content: &str, language: &str) -> Result<Vec<Message>> {
    let json: Value = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse overrides for '{}'", language))?;
    let Value::Object(contexts) = json else {
        bail!("Root of override file for '{}' must be an object", language);
    };

    let mut messages = Vec::new();
    for (context, entries) in &contexts {
        let Some((kind, field)) = split_context(context) else {
            bail!("Invalid context \"{}\": expected \"Kind.field\"", context);
        };
        let Value::Object(entries) = entries else {
            bail!("Overrides for \"{}\" must be an object", context);
        };

        for (key, value) in entries {
            if key == CONTEXT_FREE_KEY {
                let Value::Array(texts) = value else {
                    bail!("\"{}\" in \"{}\" must be an array of strings", key, context);
                };
                for text in texts {
                    let Some(text) = text.as_str() else {
                        bail!("\"{}\" in \"{}\" must be an array of strings", key, context);
                    };
                    messages.push(
                        Message::context_free(kind, field, text, Origin::Override)
                            .with_source_text(""),
                    );
                }
                continue;
            }

            let id: i64 = key
                .parse()
                .with_context(|| format!("Invalid entity id \"{}\" in \"{}\"", key, context))?;
            let Some(text) = value.as_str() else {
                bail!("Override for {}:{} must be a string", context, id);
            };
            messages
                .push(Message::new(kind, id, field, text, Origin::Override).with_source_text(""));
        }
    }

    tracing::debug!(language, count = messages.len(), "parsed overrides");
    Ok(messages)
}

/// Read the override file of `language`. A missing file yields no messages.
pub fn read_overrides(root: &Path, language: &str) -> Result<Vec<Message>> {
    let path = override_path(root, language);
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read override file: {}", path.display()))?;
    parse_overrides(&content, language)
        .with_context(|| format!("Invalid override file: {}", path.display()))
}

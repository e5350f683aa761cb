//! Source dataset loading.
//!
//! The dataset is a JSON export of every translatable field:
//!
//! ```json
//! { "strings": [
//!     { "kind": "Location", "id": 1, "field": "name", "text": "Route 1",
//!       "translations": { "fr": "Route 1" } }
//! ] }
//! ```
//!
//! Strings without an `id` are context-free.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{
    EntityResolver, Message, Origin, normalize_numbers,
    sort_key::{GroupKey, message_keys},
    sort_messages,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetString {
    pub kind: String,
    #[serde(default)]
    pub id: Option<i64>,
    pub field: String,
    pub text: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub strings: Vec<DatasetString>,
}

fn to_message(string: &DatasetString, text: &str, origin: Origin) -> Message {
    Message {
        entity_kind: string.kind.clone(),
        entity_id: string.id,
        field_name: string.field.clone(),
        text: text.to_string(),
        source_text: string.text.clone(),
        is_placeholder_normalized: false,
        is_fuzzy: false,
        origin,
    }
}

impl Dataset {
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse dataset")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid dataset: {}", path.display()))
    }

    /// Every kind name the dataset uses.
    pub fn kinds(&self) -> BTreeSet<&str> {
        self.strings.iter().map(|s| s.kind.as_str()).collect()
    }

    /// Languages with at least one official translation.
    pub fn languages(&self) -> BTreeSet<&str> {
        self.strings
            .iter()
            .flat_map(|s| s.translations.keys().map(String::as_str))
            .collect()
    }

    /// The canonical source stream, sorted.
    ///
    /// For a template (`language` is `None`) each message carries its source
    /// text. For a language it is an empty fuzzy message, so that any exact
    /// translation wins while untranslated fields still reach the catalog.
    pub fn source_messages<R: EntityResolver + ?Sized>(
        &self,
        language: Option<&str>,
        resolver: &R,
    ) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .strings
            .iter()
            .map(|string| match language {
                None => to_message(string, &string.text, Origin::Source),
                Some(_) => to_message(string, "", Origin::Source).fuzzy(),
            })
            .collect();
        sort_messages(&mut messages, resolver);
        messages
    }

    /// Official translations for `language`, sorted.
    pub fn official_messages<R: EntityResolver + ?Sized>(
        &self,
        language: &str,
        resolver: &R,
    ) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .strings
            .iter()
            .filter_map(|string| {
                let text = string.translations.get(language)?;
                (!text.is_empty()).then(|| to_message(string, text, Origin::Official))
            })
            .collect();
        sort_messages(&mut messages, resolver);
        messages
    }

    /// Bring translations read from catalogs or overrides up to date.
    ///
    /// A message without a source text takes the current one. A message
    /// whose source text no longer matches the dataset (ignoring numbers)
    /// is marked fuzzy and gets the current source text. Located messages of
    /// a known kind whose field is gone from the dataset are split off as
    /// orphans. Messages of unknown kinds are left alone.
    pub fn reconcile<R: EntityResolver + ?Sized>(
        &self,
        messages: Vec<Message>,
        resolver: &R,
    ) -> Reconciled {
        let index: HashMap<GroupKey, &str> = self
            .strings
            .iter()
            .filter_map(|string| {
                let current = to_message(string, "", Origin::Source);
                let keys = message_keys(&current, resolver)?;
                Some((keys.group, string.text.as_str()))
            })
            .collect();

        let mut reconciled = Reconciled::default();
        for mut message in messages {
            let Some(keys) = message_keys(&message, resolver) else {
                reconciled.messages.push(message);
                continue;
            };
            let Some(&current) = index.get(&keys.group) else {
                if keys.resolved {
                    tracing::debug!(
                        context = %message.context(),
                        id = keys.sort.entity_id,
                        "entity is gone from the dataset"
                    );
                    reconciled.orphans.push(message);
                } else {
                    reconciled.messages.push(message);
                }
                continue;
            };

            if message.source_text.is_empty() {
                message.source_text = current.to_string();
            } else if normalize_numbers(&message.source_text) != normalize_numbers(current) {
                tracing::debug!(
                    context = %message.context(),
                    id = keys.sort.entity_id,
                    "source text changed, marking fuzzy"
                );
                message.source_text = current.to_string();
                message.is_fuzzy = true;
                reconciled.outdated += 1;
            }
            reconciled.messages.push(message);
        }
        reconciled
    }
}

/// Messages checked against the dataset.
#[derive(Debug, Default)]
pub struct Reconciled {
    /// Messages to merge, in input order.
    pub messages: Vec<Message>,
    /// Located messages whose entity field no longer exists.
    pub orphans: Vec<Message>,
    /// How many messages became fuzzy because their source text changed.
    pub outdated: usize,
}

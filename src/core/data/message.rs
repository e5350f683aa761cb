//! Message-related types.
//!
//! A [`Message`] is one candidate text for one field of one entity, coming
//! from exactly one source. Messages flow through the merger and are turned
//! into [`Entry`](super::Entry) values by the collapser.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Where a message came from.
///
/// Informational only: the merger orders streams by the position the caller
/// gives them, never by origin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Canonical strings extracted from the dataset.
    Source,
    /// Translations shipped with the dataset.
    Official,
    /// A previously written catalog file.
    Catalog,
    /// A caller-supplied override file.
    Override,
}

impl Origin {
    pub const ALL: [Origin; 4] = [
        Origin::Source,
        Origin::Official,
        Origin::Catalog,
        Origin::Override,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Source => "source",
            Origin::Official => "official",
            Origin::Catalog => "catalog",
            Origin::Override => "override",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of translatable text attached to one entity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub entity_kind: String,
    /// `None` for context-free messages.
    pub entity_id: Option<i64>,
    pub field_name: String,
    pub text: String,
    pub source_text: String,
    pub is_placeholder_normalized: bool,
    pub is_fuzzy: bool,
    pub origin: Origin,
}

impl Message {
    /// Create an exact, located message whose text is also its source text.
    pub fn new(
        entity_kind: impl Into<String>,
        entity_id: i64,
        field_name: impl Into<String>,
        text: impl Into<String>,
        origin: Origin,
    ) -> Self {
        let text = text.into();
        Self {
            entity_kind: entity_kind.into(),
            entity_id: Some(entity_id),
            field_name: field_name.into(),
            source_text: text.clone(),
            text,
            is_placeholder_normalized: false,
            is_fuzzy: false,
            origin,
        }
    }

    /// Create a message that is not attached to any entity instance.
    pub fn context_free(
        entity_kind: impl Into<String>,
        field_name: impl Into<String>,
        text: impl Into<String>,
        origin: Origin,
    ) -> Self {
        let text = text.into();
        Self {
            entity_kind: entity_kind.into(),
            entity_id: None,
            field_name: field_name.into(),
            source_text: text.clone(),
            text,
            is_placeholder_normalized: false,
            is_fuzzy: false,
            origin,
        }
    }

    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    pub fn fuzzy(mut self) -> Self {
        self.is_fuzzy = true;
        self
    }

    pub fn is_context_free(&self) -> bool {
        self.entity_id.is_none()
    }

    /// `Kind.field`, the context string shared by every occurrence of this field.
    pub fn context(&self) -> String {
        format_context(&self.entity_kind, &self.field_name)
    }
}

pub fn format_context(entity_kind: &str, field_name: &str) -> String {
    format!("{}.{}", entity_kind, field_name)
}

/// Split `Kind.field` at the first dot.
pub fn split_context(context: &str) -> Option<(&str, &str)> {
    let (kind, field) = context.split_once('.')?;
    if kind.is_empty() || field.is_empty() {
        return None;
    }
    Some((kind, field))
}

use std::fmt;

use super::message::{Message, format_context};

/// A pointer from an entry back to one entity field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occurrence {
    /// `Kind.field`
    pub context: String,
    pub entity_id: i64,
}

impl Occurrence {
    pub fn new(context: impl Into<String>, entity_id: i64) -> Self {
        Self {
            context: context.into(),
            entity_id,
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.context, self.entity_id)
    }
}

/// The deduplicated, collapsed output unit ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub entity_kind: String,
    pub field_name: String,
    pub text: String,
    pub source_text: String,
    /// Empty for context-free entries.
    pub occurrences: Vec<Occurrence>,
    pub is_fuzzy: bool,
    pub is_placeholder_normalized: bool,
}

impl Entry {
    pub fn context(&self) -> String {
        format_context(&self.entity_kind, &self.field_name)
    }

    pub fn is_context_free(&self) -> bool {
        self.occurrences.is_empty()
    }
}

impl From<Message> for Entry {
    fn from(message: Message) -> Self {
        let occurrences = match message.entity_id {
            Some(id) => vec![Occurrence::new(message.context(), id)],
            None => Vec::new(),
        };
        Self {
            entity_kind: message.entity_kind,
            field_name: message.field_name,
            text: message.text,
            source_text: message.source_text,
            occurrences,
            is_fuzzy: message.is_fuzzy,
            is_placeholder_normalized: message.is_placeholder_normalized,
        }
    }
}

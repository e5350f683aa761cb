//! Sort keys for messages.
//!
//! Every located message maps to a [`SortKey`]
//! `(kind, entity_id, field, is_fuzzy)`. Streams handed to the merger must be
//! ascending in this order. Within one kind/id/field, exact messages sort
//! before fuzzy ones.

use std::cmp::Ordering;

use super::{data::Message, resolve::EntityResolver};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    /// Canonical kind name, or empty when the kind could not be resolved.
    pub kind: String,
    pub entity_id: i64,
    pub field: String,
    pub is_fuzzy: bool,
}

/// The key messages are deduplicated by during a merge.
///
/// Same as the sort key without the fuzzy flag. For unresolved kinds the raw
/// kind name is kept as a final tiebreak so two unrelated stale kinds never
/// collapse into one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub kind: String,
    pub entity_id: i64,
    pub field: String,
    pub unresolved_kind: Option<String>,
}

/// Result of computing a key for a located message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedMessage {
    pub sort: SortKey,
    pub group: GroupKey,
    /// False when the degraded key was used.
    pub resolved: bool,
}

impl KeyedMessage {
    /// The order streams must follow.
    ///
    /// Identical to [`SortKey`] order for resolved kinds; stale kinds that
    /// share a degraded key are further ordered by their raw name.
    pub fn merge_order(&self) -> (&GroupKey, bool) {
        (&self.group, self.sort.is_fuzzy)
    }
}

/// Compute the sort and group keys of a message.
///
/// Returns `None` for context-free messages.
pub fn message_keys<R: EntityResolver + ?Sized>(
    message: &Message,
    resolver: &R,
) -> Option<KeyedMessage> {
    let entity_id = message.entity_id?;
    let resolved = resolver.resolve(&message.entity_kind);
    let kind = resolved.map(|def| def.name.clone()).unwrap_or_default();

    Some(KeyedMessage {
        sort: SortKey {
            kind: kind.clone(),
            entity_id,
            field: message.field_name.clone(),
            is_fuzzy: message.is_fuzzy,
        },
        group: GroupKey {
            kind,
            entity_id,
            field: message.field_name.clone(),
            unresolved_kind: match resolved {
                Some(_) => None,
                None => Some(message.entity_kind.clone()),
            },
        },
        resolved: resolved.is_some(),
    })
}

/// Sort key of a message, or `None` if it is context-free.
pub fn sort_key<R: EntityResolver + ?Sized>(message: &Message, resolver: &R) -> Option<SortKey> {
    message_keys(message, resolver).map(|keys| keys.sort)
}

/// Compare two messages the way the merger orders them.
///
/// Context-free messages sort after every located one and keep their relative
/// order (the sort is stable).
pub fn compare_messages<R: EntityResolver + ?Sized>(
    a: &Message,
    b: &Message,
    resolver: &R,
) -> Ordering {
    match (sort_key(a, resolver), sort_key(b, resolver)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Restore merge order for readers that do not guarantee it.
pub fn sort_messages<R: EntityResolver + ?Sized>(messages: &mut [Message], resolver: &R) {
    messages.sort_by_cached_key(|m| {
        // `None` sorts first for Option, so flip it to push context-free last.
        let key = message_keys(m, resolver).map(|keys| (keys.group, keys.sort.is_fuzzy));
        (key.is_none(), key)
    });
}

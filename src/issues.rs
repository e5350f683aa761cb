//! Recoverable problems found while merging.
//!
//! Nothing in the merge core aborts a run. Every problem becomes a
//! [`SyncWarning`] that is logged when it is raised and handed back to the
//! caller, who decides whether it should fail the command.

use std::fmt;

// ============================================================
// Severity and Rule
// ============================================================

/// Rule identifier for each warning type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    UnresolvedKind,
    OutOfOrder,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::UnresolvedKind => write!(f, "unresolved-kind"),
            Rule::OutOfOrder => write!(f, "out-of-order"),
        }
    }
}

// ============================================================
// Warnings
// ============================================================

/// A message refers to an entity kind the resolver does not know.
///
/// Usually a stale catalog written before a kind was renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedKindWarning {
    pub entity_kind: String,
    pub entity_id: i64,
    pub field_name: String,
    /// Position of the stream in the priority list.
    pub stream: usize,
}

/// A stream yielded a message whose sort key is lower than the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfOrderWarning {
    pub stream: usize,
    /// `Kind.field:id` of the offending message.
    pub occurrence: String,
    /// `Kind.field:id` of the message it should have preceded.
    pub previous: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    UnresolvedKind(UnresolvedKindWarning),
    OutOfOrder(OutOfOrderWarning),
}

impl SyncWarning {
    pub fn rule(&self) -> Rule {
        match self {
            SyncWarning::UnresolvedKind(_) => Rule::UnresolvedKind,
            SyncWarning::OutOfOrder(_) => Rule::OutOfOrder,
        }
    }

    /// Emit this warning through `tracing`.
    pub fn log(&self) {
        tracing::warn!(rule = %self.rule(), "{}", self);
    }
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::UnresolvedKind(w) => write!(
                f,
                "unknown entity kind '{}' for {}.{}:{} in stream {}",
                w.entity_kind, w.entity_kind, w.field_name, w.entity_id, w.stream
            ),
            SyncWarning::OutOfOrder(w) => write!(
                f,
                "stream {} is not sorted: {} follows {}",
                w.stream, w.occurrence, w.previous
            ),
        }
    }
}

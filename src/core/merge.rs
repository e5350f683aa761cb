//! K-way merge of prioritized message streams.
//!
//! Streams are given highest priority first. The merger always advances the
//! streams whose head holds the lowest [`GroupKey`]; when several streams
//! expose messages for the same key exactly one survives:
//!
//! - the first exact (non-fuzzy) message in priority order, or
//! - if every candidate is fuzzy, the first one in priority order.
//!
//! The losers are parked on a work-list and reported as obsolete once the
//! run is finished. Context-free messages are not ordered; each stream's
//! context-free messages are emitted after all located ones, in stream
//! priority order.

use std::collections::VecDeque;

use super::{
    data::Message,
    resolve::EntityResolver,
    sort_key::{GroupKey, KeyedMessage, message_keys},
};
use crate::issues::{OutOfOrderWarning, SyncWarning, UnresolvedKindWarning};

/// A lazily evaluated message stream.
pub type MessageStream<'a> = Box<dyn Iterator<Item = Message> + 'a>;

/// Everything a finished merge produces.
#[derive(Debug, Default)]
pub struct MergeOutput {
    /// Surviving messages: located ones in ascending key order, then the
    /// context-free tail.
    pub merged: Vec<Message>,
    /// Messages superseded by a higher-priority or more exact message.
    pub obsolete: Vec<Message>,
    pub warnings: Vec<SyncWarning>,
}

/// Merge `streams` (highest priority first) to completion.
pub fn merge_streams<'a, R: EntityResolver + ?Sized>(
    streams: Vec<MessageStream<'a>>,
    resolver: &'a R,
) -> MergeOutput {
    StreamMerger::new(streams, resolver).finish()
}

struct Head {
    keys: KeyedMessage,
    message: Message,
}

struct Source<'a> {
    index: usize,
    iter: MessageStream<'a>,
    head: Option<Head>,
    exhausted: bool,
    /// Key and label of the last located message, for order validation.
    last: Option<(KeyedMessage, String)>,
    context_free: VecDeque<Message>,
}

impl<'a> Source<'a> {
    fn new(index: usize, iter: MessageStream<'a>) -> Self {
        Self {
            index,
            iter,
            head: None,
            exhausted: false,
            last: None,
            context_free: VecDeque::new(),
        }
    }

    /// Pull until the next located message is at the head or the stream ends.
    fn fill<R: EntityResolver + ?Sized>(&mut self, resolver: &R, warnings: &mut Vec<SyncWarning>) {
        while self.head.is_none() && !self.exhausted {
            let Some(message) = self.iter.next() else {
                self.exhausted = true;
                break;
            };

            let Some(keys) = message_keys(&message, resolver) else {
                self.context_free.push_back(message);
                continue;
            };

            if !keys.resolved {
                raise(
                    warnings,
                    SyncWarning::UnresolvedKind(UnresolvedKindWarning {
                        entity_kind: message.entity_kind.clone(),
                        entity_id: keys.sort.entity_id,
                        field_name: message.field_name.clone(),
                        stream: self.index,
                    }),
                );
            }

            let label = occurrence_label(&message);
            if let Some((previous, previous_label)) = &self.last
                && keys.merge_order() < previous.merge_order()
            {
                raise(
                    warnings,
                    SyncWarning::OutOfOrder(OutOfOrderWarning {
                        stream: self.index,
                        occurrence: label.clone(),
                        previous: previous_label.clone(),
                    }),
                );
            }

            self.last = Some((keys.clone(), label));
            self.head = Some(Head { keys, message });
        }
    }

    /// Take every consecutive head message belonging to `group`.
    fn take_group<R: EntityResolver + ?Sized>(
        &mut self,
        group: &GroupKey,
        resolver: &R,
        warnings: &mut Vec<SyncWarning>,
        out: &mut Vec<Message>,
    ) {
        loop {
            match self.head.take() {
                Some(head) if &head.keys.group == group => {
                    out.push(head.message);
                    self.fill(resolver, warnings);
                }
                other => {
                    self.head = other;
                    break;
                }
            }
        }
    }
}

fn occurrence_label(message: &Message) -> String {
    match message.entity_id {
        Some(id) => format!("{}:{}", message.context(), id),
        None => message.context(),
    }
}

fn raise(warnings: &mut Vec<SyncWarning>, warning: SyncWarning) {
    warning.log();
    warnings.push(warning);
}

/// Lazy merger over prioritized streams.
///
/// Iterating yields the merged stream. Superseded messages and warnings stay
/// available through [`StreamMerger::obsolete`] and
/// [`StreamMerger::warnings`], or are returned together by
/// [`StreamMerger::finish`].
pub struct StreamMerger<'a, R: EntityResolver + ?Sized> {
    resolver: &'a R,
    sources: Vec<Source<'a>>,
    superseded: Vec<Message>,
    warnings: Vec<SyncWarning>,
    /// Index of the stream whose context-free messages are being emitted.
    tail_cursor: usize,
}

impl<'a, R: EntityResolver + ?Sized> StreamMerger<'a, R> {
    pub fn new(streams: Vec<MessageStream<'a>>, resolver: &'a R) -> Self {
        let sources = streams
            .into_iter()
            .enumerate()
            .map(|(index, iter)| Source::new(index, iter))
            .collect();
        Self {
            resolver,
            sources,
            superseded: Vec::new(),
            warnings: Vec::new(),
            tail_cursor: 0,
        }
    }

    pub fn obsolete(&self) -> &[Message] {
        &self.superseded
    }

    pub fn warnings(&self) -> &[SyncWarning] {
        &self.warnings
    }

    /// Drain the remaining merged messages and return all results.
    pub fn finish(mut self) -> MergeOutput {
        let merged: Vec<Message> = self.by_ref().collect();
        tracing::debug!(
            merged = merged.len(),
            obsolete = self.superseded.len(),
            warnings = self.warnings.len(),
            "merge finished"
        );
        MergeOutput {
            merged,
            obsolete: self.superseded,
            warnings: self.warnings,
        }
    }

    fn next_located(&mut self) -> Option<Message> {
        let resolver = self.resolver;
        for source in &mut self.sources {
            source.fill(resolver, &mut self.warnings);
        }

        let min = self
            .sources
            .iter()
            .filter_map(|source| source.head.as_ref())
            .map(|head| &head.keys.group)
            .min()?
            .clone();

        let mut candidates = Vec::new();
        for source in &mut self.sources {
            source.take_group(&min, resolver, &mut self.warnings, &mut candidates);
        }

        let winner = candidates.iter().position(|m| !m.is_fuzzy).unwrap_or(0);
        let message = candidates.remove(winner);
        if !candidates.is_empty() {
            tracing::trace!(
                occurrence = %occurrence_label(&message),
                origin = %message.origin,
                superseded = candidates.len(),
                "resolved duplicate key"
            );
        }
        self.superseded.extend(candidates);
        Some(message)
    }

    fn next_context_free(&mut self) -> Option<Message> {
        while let Some(source) = self.sources.get_mut(self.tail_cursor) {
            if let Some(message) = source.context_free.pop_front() {
                return Some(message);
            }
            self.tail_cursor += 1;
        }
        None
    }
}

impl<R: EntityResolver + ?Sized> Iterator for StreamMerger<'_, R> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        self.next_located().or_else(|| self.next_context_free())
    }
}

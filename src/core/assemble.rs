//! Routes merged messages into per-topic entry collections.

use std::collections::BTreeMap;

use super::{
    collapse::Collapser,
    data::{Entry, Message},
    resolve::{EntityResolver, default_topic},
};

/// Name of an output catalog (one file per topic).
pub type TopicKey = String;

/// Collapsed entries per topic.
pub type Catalogs = BTreeMap<TopicKey, Vec<Entry>>;

/// Topic a kind/field pair is written to.
pub fn topic_for<R: EntityResolver + ?Sized>(resolver: &R, kind: &str, field: &str) -> TopicKey {
    match resolver.resolve(kind) {
        Some(def) => def.topic_for(field).to_string(),
        None => default_topic(kind),
    }
}

/// Feeds entries into one lazily created [`Collapser`] per topic.
pub struct CatalogAssembler<'a, R: EntityResolver + ?Sized> {
    resolver: &'a R,
    topics: BTreeMap<TopicKey, Collapser>,
}

impl<'a, R: EntityResolver + ?Sized> CatalogAssembler<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            topics: BTreeMap::new(),
        }
    }

    pub fn push_message(&mut self, mut message: Message) {
        if let Some(def) = self.resolver.resolve(&message.entity_kind)
            && def.name != message.entity_kind
        {
            message.entity_kind = def.name.clone();
        }
        self.push(Entry::from(message));
    }

    pub fn push(&mut self, entry: Entry) {
        let topic = topic_for(self.resolver, &entry.entity_kind, &entry.field_name);
        self.topics.entry(topic).or_default().push(entry);
    }

    pub fn finish(self) -> Catalogs {
        self.topics
            .into_iter()
            .map(|(topic, collapser)| (topic, collapser.finish()))
            .collect()
    }
}

/// Route and collapse a merged message stream.
pub fn assemble<R: EntityResolver + ?Sized>(
    messages: impl IntoIterator<Item = Message>,
    resolver: &R,
) -> Catalogs {
    let mut assembler = CatalogAssembler::new(resolver);
    for message in messages {
        assembler.push_message(message);
    }
    assembler.finish()
}

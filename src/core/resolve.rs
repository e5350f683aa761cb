//! Entity kind resolution.
//!
//! Maps the kind names found in messages to canonical kind descriptors. The
//! registry is built once per run (from the source dataset plus any kinds
//! declared in config) and passed explicitly to the merger and assembler.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, bail};

use crate::config::KindConfig;

/// Canonical description of an entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDef {
    pub name: String,
    /// Catalog topic that fields of this kind are written to.
    pub topic: String,
    /// Per-field topic overrides.
    pub field_topics: BTreeMap<String, String>,
}

impl KindDef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            topic: default_topic(&name),
            name,
            field_topics: BTreeMap::new(),
        }
    }

    pub fn topic_for(&self, field_name: &str) -> &str {
        self.field_topics
            .get(field_name)
            .map(String::as_str)
            .unwrap_or(&self.topic)
    }
}

/// Topic used for a kind that has no explicit topic.
pub fn default_topic(kind: &str) -> String {
    kind.to_lowercase()
}

/// Looks up entity kinds by name.
pub trait EntityResolver {
    /// Resolve a kind name (canonical or alias) to its descriptor.
    fn resolve(&self, kind: &str) -> Option<&KindDef>;
}

/// The standard resolver: canonical kinds plus aliases.
#[derive(Debug, Default, Clone)]
pub struct KindRegistry {
    kinds: BTreeMap<String, KindDef>,
    /// alias -> canonical name
    aliases: HashMap<String, String>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind by name with default settings. No-op if already known.
    pub fn insert(&mut self, name: &str) {
        if !self.kinds.contains_key(name) {
            self.kinds.insert(name.to_string(), KindDef::new(name));
        }
    }

    /// Register (or update) a kind from configuration.
    pub fn insert_config(&mut self, config: &KindConfig) -> Result<()> {
        if self.aliases.contains_key(&config.name) {
            bail!("Kind '{}' is already declared as an alias", config.name);
        }
        let mut def = KindDef::new(config.name.as_str());
        if let Some(topic) = &config.topic {
            def.topic = topic.clone();
        }
        def.field_topics = config.field_topics.clone();
        self.kinds.insert(config.name.clone(), def);

        for alias in &config.aliases {
            if self.kinds.contains_key(alias) {
                bail!("Alias '{}' shadows a declared kind", alias);
            }
            if let Some(existing) = self.aliases.get(alias)
                && existing != &config.name
            {
                bail!(
                    "Alias '{}' is declared for both '{}' and '{}'",
                    alias,
                    existing,
                    config.name
                );
            }
            self.aliases.insert(alias.clone(), config.name.clone());
        }
        Ok(())
    }

    pub fn from_configs<'a>(
        configs: impl IntoIterator<Item = &'a KindConfig>,
        kinds: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for config in configs {
            registry.insert_config(config)?;
        }
        for kind in kinds {
            if !registry.aliases.contains_key(kind) {
                registry.insert(kind);
            }
        }
        Ok(registry)
    }

    /// Canonical kinds, in name order.
    pub fn kinds(&self) -> impl Iterator<Item = &KindDef> {
        self.kinds.values()
    }
}

impl EntityResolver for KindRegistry {
    fn resolve(&self, kind: &str) -> Option<&KindDef> {
        self.kinds.get(kind).or_else(|| {
            self.aliases
                .get(kind)
                .and_then(|canonical| self.kinds.get(canonical))
        })
    }
}

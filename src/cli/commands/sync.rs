//! `catsync sync`: rebuild the template and every language's catalogs.
//!
//! Each configured origin becomes one sorted stream, in priority order. The
//! merged stream is routed into topics and collapsed. Translations that lost
//! the merge are kept as obsolete entries of the language catalogs.

use std::{
    collections::{BTreeSet, HashSet},
    iter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use super::super::args::SyncCommand;
use super::{CommandResult, CommandSummary, SyncSummary, TargetSummary, TopicSummary};
use crate::{
    config::{CONFIG_FILE_NAME, ConfigLoadResult, load_config, validate_priority},
    core::{
        Catalogs, Entry, KindRegistry, Message, MessageStream, Origin, assemble, merge_streams,
        sort_messages,
    },
    issues::SyncWarning,
    parsers::{
        dataset::{Dataset, Reconciled},
        overrides::{OVERRIDE_EXTENSION, read_overrides},
        po::{RenderOptions, TEMPLATE_DIR, catalog_location, read_catalog_dir, write_catalog},
    },
};

pub fn sync(cmd: SyncCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let ctx = SyncContext::load(&args.path, &args.priority)?;

    let targets: Vec<Option<String>> = match args.lang {
        Some(lang) if lang == TEMPLATE_DIR => vec![None],
        Some(lang) => vec![Some(lang)],
        None => iter::once(None)
            .chain(ctx.languages()?.into_iter().map(Some))
            .collect(),
    };

    let mut summaries = Vec::with_capacity(targets.len());
    let mut warnings = Vec::new();
    for language in &targets {
        let plan = ctx.plan(language.as_deref())?;
        if args.apply {
            plan.write(ctx.output_root())?;
        }
        summaries.push(plan.summarize(ctx.output_root()));
        warnings.extend(plan.warnings);
    }

    Ok(CommandResult {
        summary: CommandSummary::Sync(SyncSummary {
            targets: summaries,
            is_apply: args.apply,
        }),
        warnings,
        deny_warnings: args.deny_warnings,
    })
}

/// Everything that is loaded once per run.
pub struct SyncContext {
    dataset: Dataset,
    registry: KindRegistry,
    priority: Vec<Origin>,
    catalog_root: PathBuf,
    overrides_root: PathBuf,
    output_root: PathBuf,
}

impl SyncContext {
    /// Load config, dataset and kind registry. A non-empty `priority`
    /// replaces the configured one.
    pub fn load(start_dir: &Path, priority: &[Origin]) -> Result<Self> {
        let ConfigLoadResult {
            config,
            base_dir,
            from_file,
        } = load_config(start_dir)?;
        if !from_file {
            tracing::info!("no {} found, using defaults", CONFIG_FILE_NAME);
        }

        let priority = if priority.is_empty() {
            config.priority.clone()
        } else {
            validate_priority(priority)?;
            priority.to_vec()
        };

        let dataset = Dataset::load(&base_dir.join(&config.source_file))?;
        let registry = KindRegistry::from_configs(&config.kinds, dataset.kinds())
            .context("Failed to build kind registry")?;
        tracing::info!(
            kinds = registry.kinds().count(),
            strings = dataset.strings.len(),
            "loaded dataset"
        );

        Ok(Self {
            catalog_root: base_dir.join(&config.catalog_root),
            overrides_root: base_dir.join(&config.overrides_root),
            output_root: base_dir.join(config.output_root()),
            dataset,
            registry,
            priority,
        })
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Languages found in the dataset, the catalog directory or the overrides.
    pub fn languages(&self) -> Result<BTreeSet<String>> {
        let mut languages: BTreeSet<String> = self
            .dataset
            .languages()
            .into_iter()
            .map(str::to_string)
            .collect();

        for entry in list_dir(&self.catalog_root)? {
            if entry.file_type().is_dir()
                && let Some(name) = entry.file_name().to_str()
                && name != TEMPLATE_DIR
                && !name.starts_with('.')
            {
                languages.insert(name.to_string());
            }
        }

        for entry in list_dir(&self.overrides_root)? {
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == OVERRIDE_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                languages.insert(stem.to_string());
            }
        }

        Ok(languages)
    }

    /// Merge every stream of `language` (`None` for the template).
    pub fn plan(&self, language: Option<&str>) -> Result<TargetPlan> {
        let label = language.unwrap_or(TEMPLATE_DIR);
        let order = self.stream_order(language);
        let mut streams: Vec<MessageStream<'_>> = Vec::with_capacity(order.len());
        let mut outdated_count = 0;
        let mut orphans = Vec::new();
        for origin in order {
            let stream = self.load_stream(origin, language)?;
            tracing::debug!(
                language = label,
                %origin,
                count = stream.messages.len(),
                orphans = stream.orphans.len(),
                "loaded stream"
            );
            outdated_count += stream.outdated;
            orphans.extend(stream.orphans);
            streams.push(Box::new(stream.messages.into_iter()));
        }

        let output = merge_streams(streams, &self.registry);
        let catalogs = assemble(output.merged, &self.registry);
        let obsolete = match language {
            Some(_) => prune_obsolete(
                &catalogs,
                assemble(
                    output
                        .obsolete
                        .into_iter()
                        .chain(orphans)
                        .filter(is_obsolete_translation),
                    &self.registry,
                ),
            ),
            None => {
                if !orphans.is_empty() {
                    tracing::info!(count = orphans.len(), "dropped template entries of removed entities");
                }
                Catalogs::new()
            }
        };
        tracing::info!(
            language = label,
            topics = catalogs.len(),
            warnings = output.warnings.len(),
            "merged"
        );

        Ok(TargetPlan {
            language: language.map(str::to_string),
            catalogs,
            obsolete,
            outdated_count,
            warnings: output.warnings,
        })
    }

    /// Origins in merge order. In a language the source stream only carries
    /// empty placeholders, so it moves behind every other origin.
    fn stream_order(&self, language: Option<&str>) -> Vec<Origin> {
        let mut order = self.priority.clone();
        if language.is_some() {
            order.sort_by_key(|origin| *origin == Origin::Source);
        }
        order
    }

    /// Load one origin's stream, sorted. Catalog and override messages are
    /// reconciled against the dataset first.
    fn load_stream(&self, origin: Origin, language: Option<&str>) -> Result<Reconciled> {
        let dataset_stream = |messages: Vec<Message>| Reconciled {
            messages,
            ..Default::default()
        };
        let messages = match (origin, language) {
            (Origin::Source, _) => {
                return Ok(dataset_stream(
                    self.dataset.source_messages(language, &self.registry),
                ));
            }
            (Origin::Official, Some(language)) => {
                return Ok(dataset_stream(
                    self.dataset.official_messages(language, &self.registry),
                ));
            }
            (Origin::Official | Origin::Override, None) => return Ok(Reconciled::default()),
            (Origin::Catalog, _) => read_catalog_dir(&self.catalog_root, language)?,
            (Origin::Override, Some(language)) => read_overrides(&self.overrides_root, language)?,
        };

        let mut reconciled = self.dataset.reconcile(messages, &self.registry);
        sort_messages(&mut reconciled.messages, &self.registry);
        Ok(reconciled)
    }
}

/// Merged catalogs of one language, ready to be written.
pub struct TargetPlan {
    /// `None` for the template.
    pub language: Option<String>,
    pub catalogs: Catalogs,
    pub obsolete: Catalogs,
    pub outdated_count: usize,
    pub warnings: Vec<SyncWarning>,
}

impl TargetPlan {
    /// Topics that produce a file, in name order.
    fn topics(&self) -> BTreeSet<&str> {
        self.catalogs
            .keys()
            .chain(self.obsolete.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn entries(&self, topic: &str) -> &[Entry] {
        self.catalogs
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn obsolete_entries(&self, topic: &str) -> &[Entry] {
        self.obsolete
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn catalog_path(&self, output_root: &Path, topic: &str) -> PathBuf {
        let (dir, extension) = catalog_location(output_root, self.language.as_deref());
        dir.join(format!("{}.{}", topic, extension))
    }

    pub fn write(&self, output_root: &Path) -> Result<()> {
        let options = RenderOptions {
            language: self.language.as_deref(),
        };
        for topic in self.topics() {
            let path = self.catalog_path(output_root, topic);
            write_catalog(
                &path,
                self.entries(topic),
                self.obsolete_entries(topic),
                &options,
            )?;
            tracing::debug!(path = %path.display(), "wrote catalog");
        }
        Ok(())
    }

    pub fn summarize(&self, output_root: &Path) -> TargetSummary {
        let topics = self
            .topics()
            .into_iter()
            .map(|topic| {
                let entries = self.entries(topic);
                TopicSummary {
                    topic: topic.to_string(),
                    path: self.catalog_path(output_root, topic),
                    entry_count: entries.len(),
                    untranslated_count: entries.iter().filter(|e| e.text.is_empty()).count(),
                    fuzzy_count: entries
                        .iter()
                        .filter(|e| e.is_fuzzy && !e.text.is_empty())
                        .count(),
                    obsolete_count: self.obsolete_entries(topic).len(),
                }
            })
            .collect();

        TargetSummary {
            language: self.language.clone(),
            topics,
            outdated_count: self.outdated_count,
            warning_count: self.warnings.len(),
        }
    }
}

/// Superseded messages worth keeping: real translations only.
fn is_obsolete_translation(message: &Message) -> bool {
    !message.text.is_empty() && message.origin != Origin::Source
}

/// Drop obsolete entries the live catalog already carries with the same text.
fn prune_obsolete(catalogs: &Catalogs, obsolete: Catalogs) -> Catalogs {
    obsolete
        .into_iter()
        .filter_map(|(topic, entries)| {
            let live: HashSet<(String, &str)> = catalogs
                .get(&topic)
                .into_iter()
                .flatten()
                .map(|entry| (entry.context(), entry.text.as_str()))
                .collect();
            let entries: Vec<Entry> = entries
                .into_iter()
                .filter(|entry| !live.contains(&(entry.context(), entry.text.as_str())))
                .collect();
            (!entries.is_empty()).then_some((topic, entries))
        })
        .collect()
}

fn list_dir(dir: &Path) -> Result<Vec<DirEntry>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.with_context(|| format!("Failed to read directory: {}", dir.display())))
        .collect()
}

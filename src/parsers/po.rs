//! PO catalog reading and writing.
//!
//! Catalogs are plain gettext files, parsed and rendered with `rspolib`. Each
//! entry carries its occurrences as `#:` references (`Kind.field:id`), the
//! context as `msgctxt`, the source text as `msgid` and the translation as
//! `msgstr`. Two flags are used: `fuzzy` and `number-placeholder` (the texts
//! contain `{num}` tokens).

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use rspolib::{POEntry, POFile, pofile};
use walkdir::WalkDir;

use crate::core::{Entry, Message, Origin, data::split_context};

pub const FUZZY_FLAG: &str = "fuzzy";
pub const PLACEHOLDER_FLAG: &str = "number-placeholder";

pub const CATALOG_EXTENSION: &str = "po";
pub const TEMPLATE_EXTENSION: &str = "pot";
/// Directory holding the template catalogs, next to the language directories.
pub const TEMPLATE_DIR: &str = "template";

const CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Parse PO content.
pub fn parse_po(content: &str) -> Result<POFile> {
    pofile(content).map_err(|err| anyhow!("{}", err))
}

fn has_flag(entry: &POEntry, flag: &str) -> bool {
    entry.flags.iter().any(|f| f == flag)
}

/// Parse an occurrence `(Kind.field, id)`.
fn parse_occurrence<'a>(context: &'a str, id: &str) -> Option<(&'a str, &'a str, i64)> {
    let id = id.parse().ok()?;
    let (kind, field) = split_context(context)?;
    Some((kind, field, id))
}

/// Turn a catalog entry into one message per occurrence.
///
/// Obsolete, plural and untranslated entries yield nothing. An entry without
/// usable references yields a single context-free message.
pub fn entry_messages(entry: &POEntry) -> Vec<Message> {
    let is_header = entry.msgid.is_empty() && entry.msgctxt.is_none();
    if entry.obsolete || is_header {
        return Vec::new();
    }
    if entry.msgid_plural.is_some() {
        tracing::warn!(
            line = entry.linenum,
            msgid = %entry.msgid,
            "plural catalog entries are not merged, skipping"
        );
        return Vec::new();
    }
    let text = entry.msgstr.as_deref().unwrap_or_default();
    if text.is_empty() {
        return Vec::new();
    }

    let template = Message {
        entity_kind: String::new(),
        entity_id: None,
        field_name: String::new(),
        text: text.to_string(),
        source_text: entry.msgid.clone(),
        is_placeholder_normalized: has_flag(entry, PLACEHOLDER_FLAG),
        is_fuzzy: has_flag(entry, FUZZY_FLAG),
        origin: Origin::Catalog,
    };

    let mut messages = Vec::new();
    let mut malformed = false;
    for (context, id) in &entry.occurrences {
        match parse_occurrence(context, id) {
            Some((kind, field, id)) => messages.push(Message {
                entity_kind: kind.to_string(),
                entity_id: Some(id),
                field_name: field.to_string(),
                ..template.clone()
            }),
            None => malformed = true,
        }
    }

    if messages.is_empty() || malformed {
        let context = entry
            .msgctxt
            .as_deref()
            .and_then(split_context)
            .or_else(|| {
                entry
                    .occurrences
                    .iter()
                    .find_map(|(context, _)| split_context(context))
            });
        match context {
            Some((kind, field)) => messages.push(Message {
                entity_kind: kind.to_string(),
                field_name: field.to_string(),
                ..template
            }),
            None => tracing::warn!(
                line = entry.linenum,
                msgid = %entry.msgid,
                "catalog entry has no context, skipping"
            ),
        }
    }
    messages
}

/// Options for rendering a catalog.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    /// `None` renders a template: every msgstr is left empty.
    pub language: Option<&'a str>,
}

fn po_entry(entry: &Entry, template: bool, obsolete: bool) -> POEntry {
    let mut po = POEntry::new(0);
    po.msgctxt = Some(entry.context());
    po.msgid = entry.source_text.clone();
    po.msgstr = Some(if template {
        String::new()
    } else {
        entry.text.clone()
    });
    po.obsolete = obsolete;
    if !obsolete {
        po.occurrences = entry
            .occurrences
            .iter()
            .map(|o| (o.context.clone(), o.entity_id.to_string()))
            .collect();
    }

    if entry.is_fuzzy && !template && !entry.text.is_empty() {
        po.flags.push(FUZZY_FLAG.to_string());
    }
    if entry.is_placeholder_normalized {
        po.flags.push(PLACEHOLDER_FLAG.to_string());
    }
    po
}

/// Build the catalog for `entries`. Obsolete entries are only kept in
/// language catalogs.
fn build_catalog(entries: &[Entry], obsolete: &[Entry], options: &RenderOptions) -> Result<POFile> {
    let template = options.language.is_none();
    let mut file = parse_po("")?;
    file.metadata
        .insert("Content-Type".to_string(), CONTENT_TYPE.to_string());
    if let Some(language) = options.language {
        file.metadata
            .insert("Language".to_string(), language.to_string());
    }

    file.entries
        .extend(entries.iter().map(|entry| po_entry(entry, template, false)));
    if !template {
        file.entries
            .extend(obsolete.iter().map(|entry| po_entry(entry, false, true)));
    }
    Ok(file)
}

pub fn render_catalog(entries: &[Entry], obsolete: &[Entry], options: &RenderOptions) -> Result<String> {
    Ok(build_catalog(entries, obsolete, options)?.to_string())
}

/// Write a rendered catalog, creating parent directories.
pub fn write_catalog(
    path: &Path,
    entries: &[Entry],
    obsolete: &[Entry],
    options: &RenderOptions,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let rendered = render_catalog(entries, obsolete, options)
        .with_context(|| format!("Failed to render catalog: {}", path.display()))?;
    fs::write(path, rendered).with_context(|| format!("Failed to write catalog: {}", path.display()))
}

pub fn read_catalog(path: &Path) -> Result<Vec<Message>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    let file = parse_po(&content)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    Ok(file.entries.iter().flat_map(entry_messages).collect())
}

/// Directory and extension of a language's catalogs under `root`.
pub fn catalog_location(root: &Path, language: Option<&str>) -> (PathBuf, &'static str) {
    match language {
        Some(language) => (root.join(language), CATALOG_EXTENSION),
        None => (root.join(TEMPLATE_DIR), TEMPLATE_EXTENSION),
    }
}

/// Read every catalog file of a language, in file name order.
///
/// A missing directory yields no messages. The result is not sorted.
pub fn read_catalog_dir(root: &Path, language: Option<&str>) -> Result<Vec<Message>> {
    let (dir, extension) = catalog_location(root, language);
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "no catalog directory");
        return Ok(Vec::new());
    }

    let mut messages = Vec::new();
    for entry in WalkDir::new(&dir).max_depth(1).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            messages.extend(read_catalog(path)?);
        }
    }
    Ok(messages)
}

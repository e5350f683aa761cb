//! Number-placeholder collapsing.
//!
//! Entries whose text only differs by embedded numbers ("Route 1",
//! "Route 2") are folded into one entry ("Route {num}") carrying every
//! occurrence. Parametric texts are discovered lazily: a group keeps the
//! literal text of its first member until a second member shows up, so a
//! singular "Porygon2" is written as is.

use std::{borrow::Cow, collections::HashMap, sync::LazyLock};

use regex::{NoExpand, Regex};

use super::data::Entry;

/// Token that replaces every run of digits.
pub const NUMBER_PLACEHOLDER: &str = "{num}";

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Replace every maximal run of ASCII digits with [`NUMBER_PLACEHOLDER`].
pub fn normalize_numbers(text: &str) -> Cow<'_, str> {
    DIGIT_RUN.replace_all(text, NoExpand(NUMBER_PLACEHOLDER))
}

/// Text an entry is grouped by: the source text when there is one.
fn group_text(entry: &Entry) -> &str {
    if entry.source_text.is_empty() {
        &entry.text
    } else {
        &entry.source_text
    }
}

/// Accumulates the members of one placeholder group.
#[derive(Debug)]
pub struct EntryBuilder {
    representative: Entry,
    members: usize,
}

impl EntryBuilder {
    pub fn new(representative: Entry) -> Self {
        Self {
            representative,
            members: 1,
        }
    }

    pub fn members(&self) -> usize {
        self.members
    }

    /// Add another member whose normalized group text matches.
    pub fn absorb(&mut self, member: Entry) {
        self.members += 1;

        let rep = &mut self.representative;
        rep.occurrences.extend(member.occurrences);
        rep.is_fuzzy |= member.is_fuzzy;
        rep.is_placeholder_normalized |= member.is_placeholder_normalized;

        if rep.text.is_empty() {
            rep.text = member.text;
        } else if !member.text.is_empty()
            && normalize_numbers(&member.text) != normalize_numbers(&rep.text)
        {
            // Members disagree on the translation; keep the first, flag for review.
            rep.is_fuzzy = true;
        }
    }

    /// Freeze the group into its final entry.
    pub fn finish(self) -> Entry {
        let mut entry = self.representative;
        if self.members > 1 {
            let text = normalize_numbers(&entry.text).into_owned();
            let source_text = normalize_numbers(&entry.source_text).into_owned();
            if text != entry.text || source_text != entry.source_text {
                entry.is_placeholder_normalized = true;
            }
            entry.text = text;
            entry.source_text = source_text;
        }
        entry
    }
}

/// Collapses the entries of one topic.
#[derive(Debug, Default)]
pub struct Collapser {
    /// (context, normalized group text) -> index into `builders`
    groups: HashMap<(String, String), usize>,
    builders: Vec<EntryBuilder>,
}

impl Collapser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        let key = (
            entry.context(),
            normalize_numbers(group_text(&entry)).into_owned(),
        );
        match self.groups.get(&key) {
            Some(&index) => self.builders[index].absorb(entry),
            None => {
                self.groups.insert(key, self.builders.len());
                self.builders.push(EntryBuilder::new(entry));
            }
        }
    }

    /// Finish every group, in the order groups were first seen.
    pub fn finish(self) -> Vec<Entry> {
        self.builders.into_iter().map(EntryBuilder::finish).collect()
    }
}

/// Collapse a sequence of entries in one pass.
pub fn collapse(entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
    let mut collapser = Collapser::new();
    for entry in entries {
        collapser.push(entry);
    }
    collapser.finish()
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::data::{Message, Occurrence, Origin};

    fn entry(kind: &str, id: i64, text: &str) -> Entry {
        Entry::from(Message::new(kind, id, "name", text, Origin::Source))
    }

    #[test]
    fn test_normalize_numbers() {
        assert_eq!(normalize_numbers("Route 12"), "Route {num}");
        assert_eq!(normalize_numbers("B1F-B23F"), "B{num}F-B{num}F");
        assert_eq!(normalize_numbers("Pallet Town"), "Pallet Town");
        assert!(matches!(normalize_numbers("no digits"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_collapses_numeric_siblings() {
        let entries = collapse(vec![
            entry("Location", 1, "Route 1"),
            entry("Location", 2, "Route 2"),
        ]);

        assert_eq!(entries.len(), 1);
        assert_snapshot!(&entries[0].text, @"Route {num}");
        assert_eq!(entries[0].source_text, "Route {num}");
        assert!(entries[0].is_placeholder_normalized);
        assert_eq!(
            entries[0].occurrences,
            vec![
                Occurrence::new("Location.name", 1),
                Occurrence::new("Location.name", 2)
            ]
        );
    }

    #[test]
    fn test_singular_text_is_kept_literal() {
        let entries = collapse(vec![entry("Pokemon", 137, "Porygon2")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Porygon2");
        assert!(!entries[0].is_placeholder_normalized);
    }

    #[test]
    fn test_identical_texts_merge_without_placeholder_flag() {
        let entries = collapse(vec![
            entry("Location", 1, "Pallet Town"),
            entry("Location", 9, "Pallet Town"),
        ]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Pallet Town");
        assert!(!entries[0].is_placeholder_normalized);
        assert_eq!(entries[0].occurrences.len(), 2);
    }

    #[test]
    fn test_contexts_are_not_mixed() {
        let entries = collapse(vec![
            entry("Location", 1, "Route 1"),
            entry("Item", 1, "Route 1"),
        ]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Route 1");
        assert_eq!(entries[1].text, "Route 1");
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let entries = collapse(vec![
            entry("Location", 1, "Route 1"),
            entry("Location", 2, "Pallet Town"),
            entry("Location", 3, "Route 3"),
        ]);
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Route {num}", "Pallet Town"]);
    }

    #[test]
    fn test_groups_by_source_text() {
        let mut first = entry("Location", 1, "Route 1");
        first.text = "Chemin 1".to_string();
        let mut second = entry("Location", 2, "Route 2");
        second.text = "Chemin 2".to_string();

        let entries = collapse(vec![first, second]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Chemin {num}");
        assert_eq!(entries[0].source_text, "Route {num}");
        assert!(!entries[0].is_fuzzy);
    }

    #[test]
    fn test_disagreeing_translations_become_fuzzy() {
        let mut first = entry("Location", 1, "Route 1");
        first.text = "Chemin 1".to_string();
        let mut second = entry("Location", 2, "Route 2");
        second.text = "Sentier 2".to_string();

        let entries = collapse(vec![first, second]);
        assert_eq!(entries[0].text, "Chemin {num}");
        assert!(entries[0].is_fuzzy);
    }

    #[test]
    fn test_untranslated_representative_adopts_member_text() {
        let mut first = entry("Location", 1, "Route 1");
        first.text = String::new();
        first.is_fuzzy = true;
        let mut second = entry("Location", 2, "Route 2");
        second.text = "Chemin 2".to_string();

        let entries = collapse(vec![first, second]);
        assert_eq!(entries[0].text, "Chemin {num}");
        assert!(entries[0].is_fuzzy);
    }

    #[test]
    fn test_context_free_entries_group_by_text() {
        let entries = collapse(vec![
            Entry::from(Message::context_free(
                "Pokemon",
                "genus",
                "Seed",
                Origin::Source,
            )),
            Entry::from(Message::context_free(
                "Pokemon",
                "genus",
                "Seed",
                Origin::Catalog,
            )),
            entry("Pokemon", 1, "Seed"),
        ]);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_context_free());
        assert_eq!(entries[1].occurrences.len(), 1);
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let once = collapse(vec![
            entry("Location", 1, "Route 1"),
            entry("Location", 2, "Route 2"),
            entry("Location", 3, "Pallet Town"),
            entry("Pokemon", 137, "Porygon2"),
        ]);
        let twice = collapse(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_builder_counts_members() {
        let mut builder = EntryBuilder::new(entry("Location", 1, "Route 1"));
        builder.absorb(entry("Location", 2, "Route 2"));
        assert_eq!(builder.members(), 2);
        assert_eq!(builder.finish().text, "Route {num}");
    }
}

//! catsync - merge translation catalogs from several sources
//!
//! catsync rebuilds per-topic translation catalogs for a structured dataset.
//! Candidate messages come from the dataset itself, its official translations,
//! previously written catalogs and hand-written overrides. They are merged by
//! priority, collapsed when they only differ by numbers, and written back as
//! PO catalogs.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Sort keys, stream merging, collapsing and catalog assembly
//! - `issues`: Warnings raised while merging
//! - `parsers`: Dataset, catalog and override file formats

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod parsers;

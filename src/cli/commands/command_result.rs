use std::path::PathBuf;

use super::super::exit_status::ExitStatus;
use crate::{issues::SyncWarning, parsers::po::TEMPLATE_DIR};

#[derive(Debug)]
pub enum CommandSummary {
    Sync(SyncSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct SyncSummary {
    pub targets: Vec<TargetSummary>,
    pub is_apply: bool,
}

impl SyncSummary {
    pub fn file_count(&self) -> usize {
        self.targets.iter().map(|t| t.topics.len()).sum()
    }
}

/// One language (or the template) as it was synced.
#[derive(Debug)]
pub struct TargetSummary {
    /// `None` for the template.
    pub language: Option<String>,
    pub topics: Vec<TopicSummary>,
    /// Catalog and override messages whose source text changed since they were written.
    pub outdated_count: usize,
    pub warning_count: usize,
}

impl TargetSummary {
    pub fn label(&self) -> &str {
        self.language.as_deref().unwrap_or(TEMPLATE_DIR)
    }
}

/// One output catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    pub topic: String,
    pub path: PathBuf,
    pub entry_count: usize,
    pub untranslated_count: usize,
    pub fuzzy_count: usize,
    pub obsolete_count: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running catsync commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub warnings: Vec<SyncWarning>,
    pub deny_warnings: bool,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.deny_warnings && !self.warnings.is_empty() {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

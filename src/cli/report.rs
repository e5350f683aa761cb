//! Report formatting and printing utilities.
//!
//! Separate from the commands so that catsync can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, InitSummary, SyncSummary, TargetSummary};
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

/// Print a command result to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Sync(summary) => print_sync(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
    print_warning_count(result.warnings.len(), result.deny_warnings, writer);
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

fn print_target<W: Write>(target: &TargetSummary, writer: &mut W) {
    let _ = writeln!(writer, "{}", target.label().bold());
    for topic in &target.topics {
        let file_name = topic.path.file_name().unwrap_or_default().to_string_lossy();
        let mut details = vec![plural(topic.entry_count, "entry", "entries")];
        if topic.untranslated_count > 0 {
            details.push(format!("{} untranslated", topic.untranslated_count));
        }
        if topic.fuzzy_count > 0 {
            details.push(format!("{} fuzzy", topic.fuzzy_count));
        }
        if topic.obsolete_count > 0 {
            details.push(format!("{} obsolete", topic.obsolete_count));
        }
        let _ = writeln!(writer, "  {} ({})", file_name, details.join(", "));
    }
    if target.outdated_count > 0 {
        let _ = writeln!(
            writer,
            "  {} {} marked fuzzy after a source change",
            "note:".bold().cyan(),
            plural(target.outdated_count, "translation", "translations")
        );
    }
    if target.warning_count > 0 {
        let _ = writeln!(
            writer,
            "  {} {}",
            "warning:".bold().yellow(),
            plural(target.warning_count, "warning", "warnings")
        );
    }
}

fn print_sync<W: Write>(summary: &SyncSummary, writer: &mut W) {
    for target in &summary.targets {
        print_target(target, writer);
    }

    let files = plural(summary.file_count(), "catalog file", "catalog files");
    if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Wrote {}", files).green()
        );
    } else {
        let _ = writeln!(writer, "{} {}.", "Would write".yellow().bold(), files);
        let _ = writeln!(
            writer,
            "Run with {} to write these catalogs.",
            "--apply".cyan()
        );
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn print_warning_count<W: Write>(count: usize, deny_warnings: bool, writer: &mut W) {
    if count == 0 {
        return;
    }
    let label = if deny_warnings {
        "error:".bold().red()
    } else {
        "warning:".bold().yellow()
    };
    let _ = writeln!(
        writer,
        "{} {} raised while merging (see log output above)",
        label,
        plural(count, "warning", "warnings")
    );
}

// ============================================================
// Tests
// ============================================================

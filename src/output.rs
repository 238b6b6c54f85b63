//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status
//! messages, the plan summary and preview, and the progress bar shown while
//! files are moved.

use crate::file_organizer::MoveRecord;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Number of planned moves listed before the preview is cut short.
pub const DEFAULT_PREVIEW_LIMIT: usize = 30;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::success("Moved 12 files.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::error("Error: Target folder not found: /data/inbox");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::warning("No log was written for this run");
    /// ```
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::info("Organizing contents of: /home/user/Downloads");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a message in yellow, prefixed with `[DRY RUN]`.
    ///
    /// # Arguments
    ///
    /// * `message` - The dry-run message
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates and returns a progress bar for file moves.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of planned moves
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(4);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");

        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Prints the plan summary followed by the preview of the first `limit`
    /// moves.
    ///
    /// # Arguments
    ///
    /// * `target` - The folder being organized; destinations are shown relative to it
    /// * `moves` - The planned moves
    /// * `dry_run` - Whether the summary announces a dry run
    /// * `limit` - Maximum number of moves to list
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::{OutputFormatter, DEFAULT_PREVIEW_LIMIT};
    /// use sortdir::{FileOrganizer, RuleMapping};
    /// use std::path::Path;
    ///
    /// let target = Path::new("/path/to/Downloads");
    /// let moves = FileOrganizer::plan(target, &RuleMapping::builtin()).unwrap();
    /// OutputFormatter::plan_preview(target, &moves, true, DEFAULT_PREVIEW_LIMIT);
    /// ```
    pub fn plan_preview(target: &Path, moves: &[MoveRecord], dry_run: bool, limit: usize) {
        let summary = summary_line(moves.len(), dry_run);
        if dry_run {
            Self::dry_run_notice(&summary);
        } else {
            Self::info(&summary);
        }

        for line in preview_lines(target, moves, limit) {
            Self::plain(&line);
        }
    }
}

/// `Found N files to organize (...)`, naming the run mode.
pub fn summary_line(count: usize, dry_run: bool) -> String {
    let noun = if count == 1 { "file" } else { "files" };
    let mode = if dry_run { "dry run" } else { "executing" };
    format!("Found {} {} to organize ({})", count, noun, mode)
}

/// One `<source name> -> <category>/<destination name>` line per move, up to
/// `limit`, plus a trailing `... and N more` line when moves were left out.
pub fn preview_lines(target: &Path, moves: &[MoveRecord], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = moves
        .iter()
        .take(limit)
        .map(|record| {
            format!(
                "  {} -> {}",
                record.source_name(),
                record.relative_destination(target)
            )
        })
        .collect();

    if moves.len() > limit {
        lines.push(format!("  ... and {} more", moves.len() - limit));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(target: &Path, count: usize) -> Vec<MoveRecord> {
        (0..count)
            .map(|i| MoveRecord {
                source: target.join(format!("file_{}.txt", i)),
                destination: target.join("Text").join(format!("file_{}.txt", i)),
            })
            .collect()
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(4, true), "Found 4 files to organize (dry run)");
        assert_eq!(summary_line(1, false), "Found 1 file to organize (executing)");
    }

    #[test]
    fn test_preview_lines_format() {
        let target = Path::new("/downloads");
        let moves = vec![MoveRecord {
            source: target.join("photo.PNG"),
            destination: target.join("Images").join("photo.PNG"),
        }];

        assert_eq!(
            preview_lines(target, &moves, DEFAULT_PREVIEW_LIMIT),
            vec!["  photo.PNG -> Images/photo.PNG".to_string()]
        );
    }

    #[test]
    fn test_preview_lines_truncates() {
        let target = Path::new("/downloads");
        let moves = records(target, 35);

        let lines = preview_lines(target, &moves, 30);
        assert_eq!(lines.len(), 31);
        assert_eq!(lines[29], "  file_29.txt -> Text/file_29.txt");
        assert_eq!(lines[30], "  ... and 5 more");
    }

    #[test]
    fn test_preview_lines_exact_limit_has_no_trailer() {
        let target = Path::new("/downloads");
        let moves = records(target, 30);

        let lines = preview_lines(target, &moves, 30);
        assert_eq!(lines.len(), 30);
        assert!(!lines.iter().any(|l| l.contains("more")));
    }

    #[test]
    fn test_preview_lines_empty() {
        assert!(preview_lines(Path::new("/downloads"), &[], 30).is_empty());
    }
}

//! Command-line interface module for sortdir.
//!
//! This module handles:
//! - Command-line parsing
//! - Rule loading for the run
//! - Planning, previewing and executing moves

use crate::config::{MissingRulesPolicy, RuleLoader};
use crate::file_organizer::FileOrganizer;
use crate::move_log::MoveLog;
use crate::output::{DEFAULT_PREVIEW_LIMIT, OutputFormatter};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Default rules file, resolved relative to the working directory.
pub const DEFAULT_RULES_FILE: &str = "rules.json";

/// Sort the files of a folder into category subdirectories by extension.
///
/// Without `--execute` the planned moves are only previewed.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to organize [default: ~/Downloads]
    pub target: Option<PathBuf>,

    /// Extension-to-category rules (JSON, or TOML when ending in .toml)
    #[arg(long, default_value = DEFAULT_RULES_FILE)]
    pub rules: PathBuf,

    /// Move the files instead of previewing the plan
    #[arg(long)]
    pub execute: bool,

    /// Use no rules at all when the rules file is missing
    #[arg(long)]
    pub no_default_rules: bool,

    /// Number of planned moves to list in the preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
    pub preview_limit: usize,
}

impl Cli {
    pub fn command(&self) -> OrganizeCommand {
        OrganizeCommand::Organize {
            dry_run: !self.execute,
        }
    }

    /// The folder to organize, falling back to [`default_target`].
    pub fn target_dir(&self) -> PathBuf {
        self.target.clone().unwrap_or_else(default_target)
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            rules_path: self.rules.clone(),
            missing_rules: if self.no_default_rules {
                MissingRulesPolicy::Empty
            } else {
                MissingRulesPolicy::Builtin
            },
            preview_limit: self.preview_limit,
        }
    }
}

/// `$HOME/Downloads`, or `Downloads` under the working directory when `HOME`
/// is unset.
pub fn default_target() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join("Downloads")
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize {
        /// If true, preview the plan without making changes.
        dry_run: bool,
    },
}

/// Settings for one run besides the target folder.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub rules_path: PathBuf,
    pub missing_rules: MissingRulesPolicy,
    pub preview_limit: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES_FILE),
            missing_rules: MissingRulesPolicy::default(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

/// Runs the CLI application with the given command and directory path,
/// using the default rules file and options.
///
/// # Examples
///
/// ```no_run
/// use sortdir::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let result = run_cli(OrganizeCommand::Organize { dry_run: true }, Path::new("/path/to/directory"));
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_options(command, dir_path, &RunOptions::default())
}

/// Runs the CLI application with an explicit rules file.
///
/// `None` uses [`DEFAULT_RULES_FILE`].
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    rules_path: Option<&Path>,
) -> Result<(), String> {
    let mut options = RunOptions::default();
    if let Some(path) = rules_path {
        options.rules_path = path.to_path_buf();
    }
    run_cli_with_options(command, dir_path, &options)
}

/// Runs the CLI application with fully specified options.
///
/// This function:
/// 1. Checks that the target folder exists
/// 2. Loads the rules (a malformed rules file aborts the run)
/// 3. Plans one move per top-level file
/// 4. Prints the summary and preview
/// 5. When not a dry run, moves the files and writes `logs/organizer.log`
pub fn run_cli_with_options(
    command: OrganizeCommand,
    dir_path: &Path,
    options: &RunOptions,
) -> Result<(), String> {
    let OrganizeCommand::Organize { dry_run } = command;

    if !dir_path.is_dir() {
        return Err(format!("Target folder not found: {}", dir_path.display()));
    }

    let rules = RuleLoader::new(options.missing_rules)
        .load(&options.rules_path)
        .map_err(|e| format!("Error loading rules: {}", e))?;

    OutputFormatter::info(&format!("Organizing contents of: {}", dir_path.display()));

    let moves = FileOrganizer::plan(dir_path, &rules).map_err(|e| e.to_string())?;
    OutputFormatter::plan_preview(dir_path, &moves, dry_run, options.preview_limit);

    if dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
        OutputFormatter::plain(&format!(
            "Run again with --execute to move the files in {}.",
            dir_path.display()
        ));
        return Ok(());
    }

    let pb = OutputFormatter::create_progress_bar(moves.len() as u64);
    let result = FileOrganizer::execute(dir_path, &moves, |entry| {
        pb.set_message(entry.source_name.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    match result {
        Ok(log) => {
            OutputFormatter::success(&format!("Moved {} files.", log.len()));
            OutputFormatter::plain(&format!(
                "Log written to {}",
                MoveLog::log_file_path(dir_path).display()
            ));
            Ok(())
        }
        Err(e) => {
            OutputFormatter::warning(
                "Files moved before the failure stay in their new folders; no log was written.",
            );
            Err(e.to_string())
        }
    }
}

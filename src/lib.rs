//! sortdir - sort a folder's files into category subdirectories
//!
//! This library loads an extension-to-category rule table, plans a move for
//! every top-level file of a folder, previews the plan and, when asked to,
//! performs the moves and records them in `logs/organizer.log`.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod move_log;
pub mod output;

pub use config::{ConfigError, MissingRulesPolicy, RuleLoader};
pub use file_category::{FALLBACK_CATEGORY, RuleMapping};
pub use file_organizer::{FileOrganizer, MoveRecord, OrganizeError, OrganizeResult};
pub use move_log::{LogEntry, MoveLog};

pub use cli::{Cli, OrganizeCommand, RunOptions, run_cli};

/// Planning and execution of file moves.
///
/// This module turns the top-level files of a target folder into a list of
/// [`MoveRecord`]s, one per file, each pointing at a free path inside the
/// file's category subdirectory. Executing the plan creates the category
/// directories, moves the files and writes the move log.
use crate::file_category::RuleMapping;
use crate::move_log::{LogEntry, MoveLog};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A planned relocation of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// The file's current path, directly inside the target folder.
    pub source: PathBuf,
    /// The free path the file will be moved to.
    pub destination: PathBuf,
}

impl MoveRecord {
    /// The source file name, lossily converted for display.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The destination relative to `target`, `/`-separated.
    pub fn relative_destination(&self, target: &Path) -> String {
        let relative = self
            .destination
            .strip_prefix(target)
            .unwrap_or(&self.destination);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target folder does not exist.
    TargetNotFound(PathBuf),
    /// The target folder could not be listed.
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to create a category or log directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Something appeared at a planned destination before the move.
    DestinationExists(PathBuf),
    /// A non-directory entry occupies a category folder path and is not
    /// itself moved out of the way by the plan.
    CategoryBlocked(PathBuf),
    /// Failed to move a file to its destination.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Failed to write the move log.
    LogWriteFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TargetNotFound(path) => {
                write!(f, "Target folder not found: {}", path.display())
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DestinationExists(path) => {
                write!(f, "Destination already exists: {}", path.display())
            }
            Self::CategoryBlocked(path) => {
                write!(
                    f,
                    "Cannot create category folder {}: a file is in the way",
                    path.display()
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::LogWriteFailed { path, source } => {
                write!(f, "Failed to write log {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Returns `desired` if nothing exists there, otherwise the first free
/// `<stem>_<n><suffix>` sibling for n = 1, 2, ...
///
/// Dangling symlinks count as existing entries.
///
/// # Examples
///
/// ```no_run
/// use sortdir::file_organizer::unique_destination;
/// use std::path::Path;
///
/// // With PDFs/a.pdf and PDFs/a_1.pdf present, this yields PDFs/a_2.pdf.
/// let free = unique_destination(Path::new("PDFs/a.pdf"));
/// ```
pub fn unique_destination(desired: &Path) -> PathBuf {
    unique_destination_with(desired, entry_exists)
}

/// Like [`unique_destination`], with `is_taken` deciding which paths are
/// unavailable.
pub fn unique_destination_with(desired: &Path, is_taken: impl Fn(&Path) -> bool) -> PathBuf {
    if !is_taken(desired) {
        return desired.to_path_buf();
    }

    let stem = desired.file_stem().unwrap_or_default();
    let extension = desired.extension();

    (1u64..)
        .map(|n| {
            let mut name = OsString::from(stem);
            name.push(format!("_{}", n));
            if let Some(ext) = extension {
                name.push(".");
                name.push(ext);
            }
            desired.with_file_name(name)
        })
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| desired.to_path_buf())
}

fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Plans and executes moves of files into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Computes one [`MoveRecord`] per non-directory entry directly inside
    /// `target`.
    ///
    /// Directories, including symlinks resolving to directories, are skipped.
    /// Each file goes to `<target>/<category>/<file name>`, renamed with a
    /// numeric suffix when that path exists on disk or was already given to
    /// an earlier file of the same plan. Records follow the directory listing
    /// order, which is platform dependent, except that a file sitting where a
    /// category folder must be created is moved first.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::TargetNotFound` if `target` does not exist,
    /// `OrganizeError::ReadDirFailed` if it cannot be listed and
    /// `OrganizeError::CategoryBlocked` if a category folder path is occupied
    /// by an entry the plan does not move away.
    pub fn plan(target: &Path, rules: &RuleMapping) -> OrganizeResult<Vec<MoveRecord>> {
        if !target.exists() {
            return Err(OrganizeError::TargetNotFound(target.to_path_buf()));
        }

        let read_dir_failed = |e| OrganizeError::ReadDirFailed {
            path: target.to_path_buf(),
            source: e,
        };

        let mut moves = Vec::new();
        let mut planned: HashSet<PathBuf> = HashSet::new();
        for entry in fs::read_dir(target).map_err(read_dir_failed)? {
            let entry = entry.map_err(read_dir_failed)?;
            let source = entry.path();
            if source.is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            let category = rules.category_for(&file_name.to_string_lossy());
            let destination =
                unique_destination_with(&target.join(category).join(&file_name), |p| {
                    entry_exists(p) || planned.contains(p)
                });

            planned.insert(destination.clone());
            moves.push(MoveRecord {
                source,
                destination,
            });
        }

        clear_blocked_categories(target, moves)
    }

    /// Performs `moves` in order and writes the move log under `target`.
    ///
    /// `on_moved` is called after each successful move. The first failure
    /// stops the run; files already moved stay where they are and no log is
    /// written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::{FileOrganizer, RuleMapping};
    /// use std::path::Path;
    ///
    /// let target = Path::new("/path/to/Downloads");
    /// let moves = FileOrganizer::plan(target, &RuleMapping::builtin())?;
    /// let log = FileOrganizer::execute(target, &moves, |entry| println!("{}", entry))?;
    /// println!("Moved {} files", log.len());
    /// # Ok::<(), sortdir::OrganizeError>(())
    /// ```
    pub fn execute(
        target: &Path,
        moves: &[MoveRecord],
        mut on_moved: impl FnMut(&LogEntry),
    ) -> OrganizeResult<MoveLog> {
        let mut log = MoveLog::new();

        for record in moves {
            if let Some(parent) = record.destination.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    OrganizeError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source: e,
                    }
                })?;
            }

            move_file(&record.source, &record.destination)?;

            let entry = LogEntry::now(record.source_name(), record.relative_destination(target));
            on_moved(&entry);
            log.push(entry);
        }

        log.write(target)?;
        Ok(log)
    }
}

/// Reorders `moves` so that files occupying a category folder path leave
/// before that folder is created.
fn clear_blocked_categories(
    target: &Path,
    moves: Vec<MoveRecord>,
) -> OrganizeResult<Vec<MoveRecord>> {
    let mut first: HashSet<PathBuf> = HashSet::new();

    for record in &moves {
        let Some(parent) = record.destination.parent() else {
            continue;
        };
        let blockers = parent
            .ancestors()
            .take_while(|dir| *dir != target && dir.starts_with(target))
            .filter(|dir| entry_exists(dir) && !dir.is_dir());

        for blocker in blockers {
            let moved_away = moves
                .iter()
                .any(|m| m.source == blocker && !m.destination.starts_with(blocker));
            if !moved_away {
                return Err(OrganizeError::CategoryBlocked(blocker.to_path_buf()));
            }
            first.insert(blocker.to_path_buf());
        }
    }

    let (mut ordered, rest): (Vec<_>, Vec<_>) = moves
        .into_iter()
        .partition(|m| first.contains(&m.source));
    ordered.extend(rest);
    Ok(ordered)
}

/// Moves a single file without overwriting anything at `destination`.
///
/// Renames when possible; across filesystems the file is copied and the
/// source removed (see [`relocate_across_devices`]).
pub fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
    if entry_exists(destination) {
        return Err(OrganizeError::DestinationExists(destination.to_path_buf()));
    }

    let move_failed = |e| OrganizeError::FileMoveFailure {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source_error: e,
    };

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            relocate_across_devices(source, destination).map_err(move_failed)
        }
        Err(e) => Err(move_failed(e)),
    }
}

/// Copies `source` to `destination` and removes `source`.
///
/// Symlinks are recreated as links on unix. Whatever was written at
/// `destination` is removed again if the copy or the removal of `source`
/// fails, so the file never ends up in both places.
pub fn relocate_across_devices(source: &Path, destination: &Path) -> io::Result<()> {
    let copied = copy_symlink(source, destination).and_then(|linked| {
        if linked {
            Ok(())
        } else {
            fs::copy(source, destination).map(|_| ())
        }
    });

    if let Err(e) = copied.and_then(|()| fs::remove_file(source)) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    Ok(())
}

/// Recreates `source` at `destination` if it is a symlink. Returns whether it
/// was one.
#[cfg(unix)]
fn copy_symlink(source: &Path, destination: &Path) -> io::Result<bool> {
    if !fs::symlink_metadata(source)?.file_type().is_symlink() {
        return Ok(false);
    }
    std::os::unix::fs::symlink(fs::read_link(source)?, destination)?;
    Ok(true)
}

#[cfg(not(unix))]
fn copy_symlink(_source: &Path, _destination: &Path) -> io::Result<bool> {
    Ok(false)
}

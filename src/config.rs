//! Loading of the extension-to-category rules file.
//!
//! The rules file is a flat key-value document mapping an extension (without
//! the leading dot) to a category name. JSON is the default format; files
//! ending in `.toml` are read as a TOML table instead.
//!
//! ```json
//! { "pdf": "PDFs", "png": "Images", "zip": "Archives" }
//! ```
//!
//! ```toml
//! pdf = "PDFs"
//! png = "Images"
//! zip = "Archives"
//! ```
//!
//! A missing file is not an error: the [`MissingRulesPolicy`] decides whether
//! the run uses the built-in baseline or an empty mapping. A file that exists
//! but cannot be parsed is always fatal.

use crate::file_category::{RuleMapping, normalize_extension};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Errors that can occur while loading the rules file.
#[derive(Debug)]
pub enum ConfigError {
    /// The rules file exists but could not be read.
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The rules file is not a flat string-to-string document.
    Invalid { path: PathBuf, reason: String },
    /// A category would place files outside the target folder.
    InvalidCategory { extension: String, category: String },
    /// Two keys name the same extension once case and a leading dot are
    /// ignored, e.g. `"PDF"` and `".pdf"`.
    DuplicateExtension { extension: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Unreadable { path, source } => {
                write!(f, "Cannot read rules file {}: {}", path.display(), source)
            }
            ConfigError::Invalid { path, reason } => {
                write!(f, "Invalid rules file {}: {}", path.display(), reason)
            }
            ConfigError::InvalidCategory {
                extension,
                category,
            } => write!(
                f,
                "Invalid category '{}' for extension '{}': expected a relative folder name",
                category, extension
            ),
            ConfigError::DuplicateExtension { extension } => {
                write!(f, "Extension '{}' has more than one rule", extension)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// What to use when the rules file does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingRulesPolicy {
    /// Use [`RuleMapping::builtin`].
    #[default]
    Builtin,
    /// Use an empty mapping, so every file lands in the fallback category.
    Empty,
}

impl MissingRulesPolicy {
    fn fallback(self) -> RuleMapping {
        match self {
            MissingRulesPolicy::Builtin => RuleMapping::builtin(),
            MissingRulesPolicy::Empty => RuleMapping::empty(),
        }
    }
}

/// Resolves the rule mapping for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleLoader {
    policy: MissingRulesPolicy,
}

impl RuleLoader {
    pub fn new(policy: MissingRulesPolicy) -> Self {
        Self { policy }
    }

    /// Loads the rules at `path`, or the policy's default mapping when no
    /// file exists there.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Unreadable` if the file exists but cannot be read,
    /// `ConfigError::Invalid` if it does not parse as a flat mapping, and
    /// `ConfigError::InvalidCategory` if a category does not name a folder
    /// below the target (empty, absolute, `.` or containing `..`), and
    /// `ConfigError::DuplicateExtension` if two keys differ only by case or a
    /// leading dot.
    pub fn load(&self, path: &Path) -> Result<RuleMapping, ConfigError> {
        if !path.exists() {
            return Ok(self.policy.fallback());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let raw = parse_rules(path, &content)?;
        let mut seen = HashSet::new();
        for (extension, category) in &raw {
            validate_category(extension, category)?;
            let normalized = normalize_extension(extension);
            if !seen.insert(normalized.clone()) {
                return Err(ConfigError::DuplicateExtension {
                    extension: normalized,
                });
            }
        }

        Ok(raw.into_iter().collect())
    }
}

fn parse_rules(path: &Path, content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}

fn validate_category(extension: &str, category: &str) -> Result<(), ConfigError> {
    let components: Vec<_> = Path::new(category).components().collect();
    let relative = !category.trim().is_empty()
        && components.iter().any(|c| matches!(c, Component::Normal(_)))
        && components
            .iter()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if relative {
        Ok(())
    } else {
        Err(ConfigError::InvalidCategory {
            extension: extension.to_string(),
            category: category.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_rules(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("Failed to write rules file");
        path
    }

    #[test]
    fn test_missing_file_uses_builtin_by_default() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let rules = RuleLoader::default()
            .load(&dir.path().join("rules.json"))
            .expect("Missing file should not fail");
        assert_eq!(rules, RuleMapping::builtin());
    }

    #[test]
    fn test_missing_file_with_empty_policy() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let rules = RuleLoader::new(MissingRulesPolicy::Empty)
            .load(&dir.path().join("rules.json"))
            .expect("Missing file should not fail");
        assert!(rules.is_empty());
    }

    #[test]
    fn test_load_json_rules() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.json", r#"{"pdf": "PDFs", "png": "Images"}"#);

        let rules = RuleLoader::default().load(&path).expect("Valid JSON");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.extension_to_category("pdf"), Some("PDFs"));
        assert_eq!(rules.extension_to_category("png"), Some("Images"));
        assert_eq!(rules.extension_to_category("txt"), None);
    }

    #[test]
    fn test_load_toml_rules() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.toml", "mp3 = \"Music\"\nflac = \"Music\"\n");

        let rules = RuleLoader::default().load(&path).expect("Valid TOML");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.category_for("song.FLAC"), "Music");
    }

    #[test]
    fn test_keys_are_lowercased() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.json", r#"{"PDF": "PDFs", ".Png": "Images"}"#);

        let rules = RuleLoader::default().load(&path).expect("Valid JSON");
        assert_eq!(rules.extension_to_category("pdf"), Some("PDFs"));
        assert_eq!(rules.extension_to_category("png"), Some("Images"));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.json", r#"{"pdf": "PDFs","#);

        let result = RuleLoader::default().load(&path);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_non_string_values_are_rejected() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.json", r#"{"pdf": ["PDFs"]}"#);

        let result = RuleLoader::new(MissingRulesPolicy::Empty).load(&path);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_nested_toml_is_rejected() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.toml", "[images]\npng = \"Images\"\n");

        let result = RuleLoader::default().load(&path);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_escaping_categories_are_rejected() {
        let dir = TempDir::new().expect("Failed to create temp directory");

        for category in ["../PDFs", "/tmp/PDFs", "", "  ", "."] {
            let content = serde_json::json!({ "pdf": category }).to_string();
            let path = write_rules(&dir, "rules.json", &content);
            let result = RuleLoader::default().load(&path);
            assert!(
                matches!(result, Err(ConfigError::InvalidCategory { .. })),
                "category {:?} should be rejected",
                category
            );
        }
    }

    #[test]
    fn test_keys_colliding_after_normalization_are_rejected() {
        let dir = TempDir::new().expect("Failed to create temp directory");

        for content in [
            r#"{"PDF": "A", "pdf": "B"}"#,
            r#"{"pdf": "A", ".pdf": "B"}"#,
            r#"{".Pdf": "A", "pDF": "A"}"#,
        ] {
            let path = write_rules(&dir, "rules.json", content);
            let result = RuleLoader::default().load(&path);
            assert!(
                matches!(&result, Err(ConfigError::DuplicateExtension { extension }) if extension == "pdf"),
                "rules {} should be rejected, got {:?}",
                content,
                result
            );
        }
    }

    #[test]
    fn test_duplicate_extension_in_toml_is_rejected() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.toml", "PNG = \"Images\"\npng = \"Pictures\"\n");

        let result = RuleLoader::default().load(&path);
        assert!(matches!(result, Err(ConfigError::DuplicateExtension { .. })));
    }

    #[test]
    fn test_nested_relative_category_is_allowed() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_rules(&dir, "rules.json", r#"{"pdf": "Documents/PDFs"}"#);

        let rules = RuleLoader::default().load(&path).expect("Valid JSON");
        assert_eq!(rules.category_for("a.pdf"), "Documents/PDFs");
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::Invalid {
            path: PathBuf::from("rules.json"),
            reason: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid rules file rules.json: expected value"
        );
    }
}

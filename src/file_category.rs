//! Extension-to-category classification.
//!
//! A [`RuleMapping`] maps lower-cased file extensions (without the leading dot)
//! to category names. Category names are used verbatim as subdirectory names
//! of the folder being sorted.
//!
//! # Examples
//!
//! ```
//! use sortdir::file_category::{RuleMapping, FALLBACK_CATEGORY};
//!
//! let rules = RuleMapping::builtin();
//! assert_eq!(rules.category_for("report.PDF"), "PDFs");
//! assert_eq!(rules.category_for("photo.jpeg"), "Images");
//! assert_eq!(rules.category_for("README"), FALLBACK_CATEGORY);
//! ```

use std::collections::HashMap;

/// Category used for files whose extension has no rule.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Baseline rules used when no rules file is present.
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("pdf", "PDFs"),
    ("png", "Images"),
    ("jpg", "Images"),
    ("jpeg", "Images"),
    ("gif", "Images"),
    ("zip", "Archives"),
    ("rar", "Archives"),
    ("7z", "Archives"),
    ("txt", "Text"),
    ("csv", "Data"),
    ("py", "Code"),
    ("cpp", "Code"),
    ("h", "Code"),
];

/// Maps file extensions to category names.
///
/// Built once per run and never mutated afterwards; lookups lower-case the
/// extension, so keys are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMapping {
    extension_map: HashMap<String, String>,
}

impl RuleMapping {
    /// Creates an empty mapping. Every file falls back to [`FALLBACK_CATEGORY`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the baseline mapping covering common document, image, archive,
    /// text, data and source-code extensions.
    pub fn builtin() -> Self {
        BUILTIN_RULES
            .iter()
            .map(|(ext, category)| (ext.to_string(), category.to_string()))
            .collect()
    }

    /// Adds or replaces a rule. The extension is normalized (leading dot
    /// stripped, lower-cased).
    pub fn insert(&mut self, ext: &str, category: &str) {
        self.extension_map
            .insert(normalize_extension(ext), category.to_string());
    }

    /// Looks up the category for an extension, case-insensitively.
    pub fn extension_to_category(&self, ext: &str) -> Option<&str> {
        self.extension_map
            .get(&ext.to_lowercase())
            .map(String::as_str)
    }

    /// Returns the category for a file name, or [`FALLBACK_CATEGORY`] when no
    /// rule matches its extension.
    pub fn category_for(&self, file_name: &str) -> &str {
        self.extension_to_category(&extension_of(file_name))
            .unwrap_or(FALLBACK_CATEGORY)
    }

    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for RuleMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::empty();
        for (ext, category) in iter {
            mapping.insert(ext.as_ref(), category.as_ref());
        }
        mapping
    }
}

/// Returns the lower-cased text after the last `.` of a file name, or an
/// empty string when the name contains no `.`.
///
/// ```
/// use sortdir::file_category::extension_of;
///
/// assert_eq!(extension_of("archive.tar.GZ"), "gz");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Strips one leading `.` and lower-cases, the form rule keys are stored in.
pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules() {
        let rules = RuleMapping::builtin();
        assert_eq!(rules.len(), BUILTIN_RULES.len());
        assert_eq!(rules.extension_to_category("pdf"), Some("PDFs"));
        assert_eq!(rules.extension_to_category("7z"), Some("Archives"));
        assert_eq!(rules.extension_to_category("csv"), Some("Data"));
        assert_eq!(rules.extension_to_category("h"), Some("Code"));
        assert_eq!(rules.extension_to_category("mp3"), None);
    }

    #[test]
    fn test_empty_rules_fall_back() {
        let rules = RuleMapping::empty();
        assert!(rules.is_empty());
        assert_eq!(rules.category_for("a.pdf"), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_extension_lookup_case_insensitive() {
        let rules: RuleMapping = [("pdf", "PDFs")].into_iter().collect();
        assert_eq!(rules.category_for("Report.PDF"), "PDFs");
        assert_eq!(rules.category_for("report.pdf"), "PDFs");
        assert_eq!(rules.category_for("report.Pdf"), "PDFs");
    }

    #[test]
    fn test_insert_normalizes_keys() {
        let mut rules = RuleMapping::empty();
        rules.insert(".PNG", "Images");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.extension_to_category("png"), Some("Images"));
        assert_eq!(rules.category_for("photo.png"), "Images");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("notes.txt"), "txt");
        assert_eq!(extension_of("photo.PNG"), "png");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(".bashrc"), "bashrc");
    }

    #[test]
    fn test_no_extension_uses_empty_rule_when_defined() {
        let mut rules = RuleMapping::builtin();
        assert_eq!(rules.category_for("LICENSE"), FALLBACK_CATEGORY);

        rules.insert("", "NoExtension");
        assert_eq!(rules.category_for("LICENSE"), "NoExtension");
    }
}

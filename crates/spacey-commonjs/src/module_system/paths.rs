// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Specifier parsing

use crate::error::{RequireError, Result};

/// A parsed `require` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
    /// Written with a trailing separator (`./lib/`)
    trailing: bool,
}

impl<'a> Specifier<'a> {
    /// Parse a specifier. Fails with `MODULE_NOT_FOUND` when it is empty,
    /// has no segments, or contains an empty interior segment (`a//b`).
    pub fn parse(raw: &'a str) -> Result<Self> {
        let segments = split_path(raw)?;
        let trailing = raw.ends_with(['/', '\\']);
        Ok(Self {
            raw,
            segments,
            trailing,
        })
    }

    /// The specifier as written
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Starts with `/`, `./` or `../`
    pub fn is_prefixed(&self) -> bool {
        is_prefixed(self.raw)
    }

    /// All segments, in order
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Segments leading to the final name
    pub fn folders(&self) -> &[&'a str] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Final segment
    pub fn name(&self) -> &'a str {
        self.segments[self.segments.len() - 1]
    }

    /// The request is for a folder only: the final segment is `.` or `..`,
    /// or the specifier ends with a separator.
    pub fn names_folder(&self) -> bool {
        self.trailing || matches!(self.name(), "." | "..")
    }
}

/// Split a path on `/` or `\` into non-empty segments.
///
/// A single leading separator (absolute path) and trailing separators are
/// allowed; an empty segment anywhere else is rejected.
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(RequireError::module_not_found(path));
    }

    let trimmed = path.trim_end_matches(['/', '\\']);
    let trimmed = trimmed
        .strip_prefix(['/', '\\'])
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(RequireError::module_not_found(path));
    }

    let segments: Vec<&str> = trimmed.split(['/', '\\']).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(RequireError::module_not_found(path));
    }
    Ok(segments)
}

/// Returns true for specifiers resolved against the requesting folder only:
/// those starting with `/`, `./` or `../`, and `.` / `..` themselves.
pub fn is_prefixed(specifier: &str) -> bool {
    specifier.starts_with('/')
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
}

/// Split a resolved path at its final separator into `(dirname, filename)`.
pub fn split_filename(path: &str) -> (&str, &str) {
    match path.rfind(['/', '\\']) {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("./file1.js").unwrap(), vec![".", "file1.js"]);
        assert_eq!(split_path("../a/b").unwrap(), vec!["..", "a", "b"]);
        assert_eq!(split_path("/sub1/x").unwrap(), vec!["sub1", "x"]);
        assert_eq!(split_path("lodash").unwrap(), vec!["lodash"]);
        assert_eq!(split_path("./dir/").unwrap(), vec![".", "dir"]);
        assert_eq!(split_path("a\\b").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_split_path_rejects_malformed() {
        assert!(split_path("").unwrap_err().is_not_found());
        assert!(split_path("/").unwrap_err().is_not_found());
        assert!(split_path("a//b").unwrap_err().is_not_found());
        assert!(split_path("//a").unwrap_err().is_not_found());
    }

    #[test]
    fn test_is_prefixed() {
        assert!(is_prefixed("/x"));
        assert!(is_prefixed("./x"));
        assert!(is_prefixed("../x"));
        assert!(is_prefixed(".."));
        assert!(!is_prefixed("x"));
        assert!(!is_prefixed(".x"));
        assert!(!is_prefixed("..x"));
        assert!(!is_prefixed("@scope/pkg"));
    }

    #[test]
    fn test_specifier_parts() {
        let spec = Specifier::parse("./sub1/../file1").unwrap();
        assert!(spec.is_prefixed());
        assert_eq!(spec.folders(), &[".", "sub1", ".."]);
        assert_eq!(spec.name(), "file1");
        assert!(!spec.names_folder());
        assert!(Specifier::parse("..").unwrap().names_folder());
        assert!(Specifier::parse("./lib/").unwrap().names_folder());
        assert!(Specifier::parse("pkg\\").unwrap().names_folder());
        assert!(!Specifier::parse("./lib").unwrap().names_folder());
    }

    #[test]
    fn test_split_filename() {
        assert_eq!(split_filename("/file1.js"), ("", "file1.js"));
        assert_eq!(split_filename("/sub1/sub1file1.js"), ("/sub1", "sub1file1.js"));
        assert_eq!(split_filename("<main>"), ("", "<main>"));
    }
}

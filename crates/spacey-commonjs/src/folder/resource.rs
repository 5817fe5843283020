// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Folder backed by resources bundled in memory

use super::{decode, is_plain_name, Folder};
use encoding_rs::{Encoding, UTF_8};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// A set of text resources keyed by `/`-separated relative path.
#[derive(Debug, Clone, Default)]
pub struct ResourceBundle {
    resources: BTreeMap<String, String>,
}

impl ResourceBundle {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, e.g. `insert("lib/foo.js", "exports.foo = 1;")`.
    /// Leading separators and `.` segments are ignored.
    pub fn insert(&mut self, path: &str, content: impl Into<String>) -> &mut Self {
        let key = path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect::<Vec<_>>()
            .join("/");
        self.resources.insert(key, content.into());
        self
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, path: &str, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Snapshot every UTF-8 file under `dir` into a bundle
    pub fn from_dir(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::from_dir_with_encoding(dir, UTF_8)
    }

    /// Snapshot every file under `dir` that decodes in `encoding`
    pub fn from_dir_with_encoding(
        dir: impl AsRef<Path>,
        encoding: &'static Encoding,
    ) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        let mut bundle = Self::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(std::io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(std::io::Error::other)?;
            let bytes = match std::fs::read(entry.path()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            match decode(&bytes, encoding) {
                Some(content) => {
                    bundle.insert(&relative.to_string_lossy(), content);
                }
                None => debug!(
                    "Skipping {}: not valid {}",
                    entry.path().display(),
                    encoding.name()
                ),
            }
        }
        Ok(bundle)
    }

    /// Get a resource by relative path
    pub fn get(&self, path: &str) -> Option<&str> {
        self.resources.get(path).map(String::as_str)
    }

    /// Check whether any resource lives under `prefix` (which ends with `/`)
    fn has_prefix(&self, prefix: &str) -> bool {
        self.resources
            .range(prefix.to_string()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix))
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the bundle is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// A folder inside a [`ResourceBundle`]. The bundle root has path `/`.
#[derive(Debug, Clone)]
pub struct ResourceFolder {
    bundle: Arc<ResourceBundle>,
    /// Key prefix inside the bundle, empty at the root
    prefix: String,
    path: String,
    parent: Option<Arc<ResourceFolder>>,
}

impl ResourceFolder {
    /// Create the root folder of a bundle
    pub fn create(bundle: impl Into<Arc<ResourceBundle>>) -> Self {
        Self {
            bundle: bundle.into(),
            prefix: String::new(),
            path: "/".to_string(),
            parent: None,
        }
    }
}

impl Folder for ResourceFolder {
    fn path(&self) -> &str {
        &self.path
    }

    fn parent(&self) -> Option<Arc<dyn Folder>> {
        self.parent
            .as_ref()
            .map(|p| Arc::clone(p) as Arc<dyn Folder>)
    }

    fn file(&self, name: &str) -> Option<String> {
        if !is_plain_name(name) {
            return None;
        }
        self.bundle
            .get(&format!("{}{}", self.prefix, name))
            .map(str::to_string)
    }

    fn folder(&self, name: &str) -> Option<Arc<dyn Folder>> {
        if !is_plain_name(name) {
            return None;
        }
        let prefix = format!("{}{}/", self.prefix, name);
        if !self.bundle.has_prefix(&prefix) {
            return None;
        }
        Some(Arc::new(ResourceFolder {
            bundle: Arc::clone(&self.bundle),
            prefix,
            path: format!("{}{}/", self.path, name),
            parent: Some(Arc::new(self.clone())),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> ResourceBundle {
        ResourceBundle::new()
            .with("foo.js", "exports.foo = 'foo';")
            .with("subdir/bar.js", "exports.bar = 'bar';")
            .with("subdir/subsubdir/baz.js", "exports.baz = 'baz';")
    }

    #[test]
    fn test_root_folder_properties() {
        let root = ResourceFolder::create(bundle());
        assert_eq!(root.path(), "/");
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_get_file() {
        let root = ResourceFolder::create(bundle());
        assert!(root.file("foo.js").unwrap().contains("foo"));
        assert!(root.file("invalid").is_none());
        assert!(root.file("subdir").is_none());
    }

    #[test]
    fn test_get_folder() {
        let root = ResourceFolder::create(bundle());
        let sub = root.folder("subdir").unwrap();
        assert_eq!(sub.path(), "/subdir/");
        assert_eq!(sub.parent().unwrap().path(), "/");
        assert!(sub.file("bar.js").unwrap().contains("bar"));

        let subsub = sub.folder("subsubdir").unwrap();
        assert_eq!(subsub.path(), "/subdir/subsubdir/");
        assert_eq!(subsub.parent().unwrap().path(), "/subdir/");
    }

    #[test]
    fn test_get_folder_requires_content() {
        let root = ResourceFolder::create(bundle());
        assert!(root.folder("invalid").is_none());
        // "sub" is a prefix of "subdir" but not a folder
        assert!(root.folder("sub").is_none());
        assert!(root.folder("foo.js").is_none());
    }

    #[test]
    fn test_from_dir_with_encoding() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("lib")).unwrap();
        std::fs::write(tmp.path().join("lib/name.json"), b"\"Ren\xe9\"").unwrap();
        std::fs::write(tmp.path().join("plain.js"), "plain").unwrap();

        assert!(ResourceBundle::from_dir(tmp.path()).unwrap().get("lib/name.json").is_none());

        let bundle =
            ResourceBundle::from_dir_with_encoding(tmp.path(), encoding_rs::WINDOWS_1252).unwrap();
        assert_eq!(bundle.get("lib/name.json"), Some("\"Ren\u{e9}\""));
        assert_eq!(bundle.get("plain.js"), Some("plain"));
    }

    #[test]
    fn test_insert_normalizes_keys() {
        let mut bundle = ResourceBundle::new();
        bundle.insert("/./lib//foo.js", "x");
        assert_eq!(bundle.get("lib/foo.js"), Some("x"));
        assert_eq!(bundle.len(), 1);
    }
}

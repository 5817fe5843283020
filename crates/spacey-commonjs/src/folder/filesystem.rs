// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Folder backed by a directory on disk

use super::{decode, is_plain_name, Folder};
use encoding_rs::{Encoding, UTF_8};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::Arc;
use tracing::trace;

/// A directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FilesystemFolder {
    /// Directory on disk
    dir: PathBuf,
    /// Canonical path with trailing separator
    path: String,
    parent: Option<Arc<FilesystemFolder>>,
    encoding: &'static Encoding,
}

impl FilesystemFolder {
    /// Create a root folder reading UTF-8. The directory must exist; its
    /// canonical path becomes the prefix of every module id loaded through it.
    pub fn create(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = root.as_ref().canonicalize()?;
        if !dir.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("{} is not a directory", dir.display()),
            ));
        }
        let mut path = dir.display().to_string();
        if !path.ends_with(MAIN_SEPARATOR) {
            path.push(MAIN_SEPARATOR);
        }
        Ok(Self {
            dir,
            path,
            parent: None,
            encoding: UTF_8,
        })
    }

    /// Read files in `encoding` instead of UTF-8; subfolders inherit it.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Encoding files are decoded with
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Directory on disk
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Folder for FilesystemFolder {
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
        let file = self.dir.join(name);
        let bytes = match std::fs::read(&file) {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!("No readable file at {}: {}", file.display(), e);
                return None;
            }
        };
        let content = decode(&bytes, self.encoding);
        if content.is_none() {
            trace!("{} is not valid {}", file.display(), self.encoding.name());
        }
        content
    }

    fn folder(&self, name: &str) -> Option<Arc<dyn Folder>> {
        if !is_plain_name(name) {
            return None;
        }
        let dir = self.dir.join(name);
        if !dir.is_dir() {
            return None;
        }
        Some(Arc::new(FilesystemFolder {
            dir,
            path: format!("{}{}{}", self.path, name, MAIN_SEPARATOR),
            parent: Some(Arc::new(self.clone())),
            encoding: self.encoding,
        }))
    }
}

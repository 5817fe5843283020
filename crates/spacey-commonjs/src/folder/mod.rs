// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Storage backends that modules are loaded from
//!
//! A [`Folder`] is a cheap, value-like view of one directory: it knows its
//! canonical path, can read a file or open a subfolder by name, and links to
//! its parent. Two backends are provided:
//! - [`FilesystemFolder`] - a directory on disk
//! - [`ResourceFolder`] - resources bundled in memory

mod filesystem;
mod resource;

pub use filesystem::FilesystemFolder;
pub use resource::{ResourceBundle, ResourceFolder};

use encoding_rs::Encoding;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A directory modules can be read from.
///
/// Implementations must never produce a path containing `.` or `..`
/// segments, and must not create parent cycles.
pub trait Folder: Send + Sync + fmt::Debug {
    /// Canonical absolute path, ending with a separator
    fn path(&self) -> &str;

    /// Parent folder; `None` at the root
    fn parent(&self) -> Option<Arc<dyn Folder>>;

    /// Text content of the file `name`, if it exists
    fn file(&self, name: &str) -> Option<String>;

    /// Subfolder `name`, if it exists
    fn folder(&self, name: &str) -> Option<Arc<dyn Folder>>;
}

/// Names a backend refuses to treat as a single child entry.
pub(crate) fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Decode file bytes, or `None` when they are not valid in `encoding`.
pub(crate) fn decode(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

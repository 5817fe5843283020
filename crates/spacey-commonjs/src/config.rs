// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Configuration for a module system installation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RequireError, Result};
use crate::folder::is_plain_name;

/// Options controlling resolution for one installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequireOptions {
    /// Id and filename given to the root module
    pub main_id: String,

    /// Folder name searched for bare specifiers
    pub node_modules: String,

    /// Package manifest read when a folder is required
    pub package_manifest: String,
}

impl Default for RequireOptions {
    fn default() -> Self {
        Self {
            main_id: "<main>".to_string(),
            node_modules: "node_modules".to_string(),
            package_manifest: "package.json".to_string(),
        }
    }
}

impl RequireOptions {
    /// Parse options from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: Self =
            toml::from_str(content).map_err(|e| RequireError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RequireError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Every value must be a single path segment, neither `.` nor `..`.
    pub fn validate(&self) -> Result<()> {
        for (key, name) in [
            ("main_id", &self.main_id),
            ("node_modules", &self.node_modules),
            ("package_manifest", &self.package_manifest),
        ] {
            if !is_plain_name(name) {
                return Err(RequireError::Config(format!(
                    "{} must be a single path segment, got '{}'",
                    key, name
                )));
            }
        }
        Ok(())
    }
}

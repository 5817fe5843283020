// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Custom file handlers and unit kind dispatch

use super::module::Module;
use crate::error::Result;
use crate::folder::Folder;
use std::fmt;
use std::sync::Arc;

/// Compiles files with particular endings into modules, in place of the
/// built-in `.js`/`.json` handling.
///
/// A handler typically calls [`Module::create_child`] on the requesting
/// module, sets its exports and marks it loaded. The returned module is
/// cached under `resolved_path` by the loader.
pub trait FileHandler: Send + Sync {
    /// Endings this handler claims, e.g. `[".txt"]`
    fn file_endings(&self) -> Vec<String>;

    /// Build the module for one file
    fn compile(
        &self,
        folder: &Arc<dyn Folder>,
        resolved_path: &str,
        source: &str,
        requesting: &Arc<Module>,
    ) -> Result<Arc<Module>>;
}

/// How a resolved file is turned into a module.
#[derive(Clone)]
pub(crate) enum UnitKind {
    /// Source evaluated through the installation's evaluator
    Script,
    /// Parsed as JSON, used directly as exports
    Json,
    /// Delegated to a registered handler
    Custom(Arc<dyn FileHandler>),
}

impl fmt::Debug for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Script => write!(f, "Script"),
            UnitKind::Json => write!(f, "Json"),
            UnitKind::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Handlers registered on one installation.
#[derive(Default, Clone)]
pub(crate) struct HandlerRegistry {
    /// Lowercased ending and its handler, in registration order
    handlers: Vec<(String, Arc<dyn FileHandler>)>,
}

impl HandlerRegistry {
    /// Register a handler for all of its endings. A later registration for
    /// the same ending replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn FileHandler>) {
        for ending in handler.file_endings() {
            let ending = ending.to_lowercase();
            self.handlers.retain(|(existing, _)| *existing != ending);
            self.handlers.push((ending, Arc::clone(&handler)));
        }
    }

    /// Pick the unit kind for a file name; `None` means unsupported.
    pub fn kind_for(&self, filename: &str) -> Option<UnitKind> {
        let lower = filename.to_lowercase();
        let custom = self
            .handlers
            .iter()
            .filter(|(ending, _)| lower.ends_with(ending.as_str()))
            .max_by_key(|(ending, _)| ending.len());
        if let Some((_, handler)) = custom {
            return Some(UnitKind::Custom(Arc::clone(handler)));
        }

        if lower.ends_with(".js") {
            Some(UnitKind::Script)
        } else if lower.ends_with(".json") {
            Some(UnitKind::Json)
        } else {
            None
        }
    }

    /// Number of registered endings
    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

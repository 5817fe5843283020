// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The module tree and the `require` entry point

use super::cache::ModuleCache;
use super::loader::ModuleLoader;
use super::paths::split_filename;
use super::resolver::Resolution;
use crate::error::{RequireError, Result};
use crate::folder::Folder;
use crate::value::{Object, Value};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::warn;

/// One loaded unit, identified by its resolved path (or the root id).
///
/// Modules are owned by their installation, which keeps every module it
/// created until the root is dropped. `parent`, `children` and `main` are
/// non-owning links, so cyclic requires never form reference cycles.
/// Removing a module from the cache never invalidates those links.
pub struct Module {
    /// Resolved path; doubles as `filename`
    id: String,
    /// Folder the module's own relative requires start from
    folder: Arc<dyn Folder>,
    loader: Weak<ModuleLoader>,
    /// Set on the root module only: the root owns its installation
    installation: Option<Arc<ModuleLoader>>,
    parent: Option<Weak<Module>>,
    main: Weak<Module>,
    children: RwLock<Vec<Weak<Module>>>,
    exports: RwLock<Value>,
    loaded: AtomicBool,
}

impl Module {
    /// Root module of a new installation: loaded, parentless, its own `main`.
    pub(crate) fn root(folder: Arc<dyn Folder>, loader: Arc<ModuleLoader>) -> Arc<Module> {
        let id = loader.options().main_id.clone();
        Arc::new_cyclic(|me| Module {
            id,
            folder,
            loader: Arc::downgrade(&loader),
            installation: Some(loader),
            parent: None,
            main: me.clone(),
            children: RwLock::new(Vec::new()),
            exports: RwLock::new(Value::object()),
            loaded: AtomicBool::new(true),
        })
    }

    /// Create a not-yet-loaded module required by `self`.
    ///
    /// The new module shares `self`'s installation and `main`, has `self` as
    /// parent and starts with an empty object as exports. The installation
    /// keeps it alive; it is not cached and not linked as a child until the
    /// loader does so.
    pub fn create_child(self: &Arc<Self>, folder: Arc<dyn Folder>, filename: &str) -> Arc<Module> {
        let module = Arc::new(Module {
            id: filename.to_string(),
            folder,
            loader: self.loader.clone(),
            installation: None,
            parent: Some(Arc::downgrade(self)),
            main: self.main.clone(),
            children: RwLock::new(Vec::new()),
            exports: RwLock::new(Value::object()),
            loaded: AtomicBool::new(false),
        });
        if let Some(loader) = self.loader.upgrade() {
            loader.adopt(&module);
        }
        module
    }

    /// Load `specifier` relative to this module and return its exports.
    ///
    /// Prefixed specifiers (`/`, `./`, `../`) resolve against this module's
    /// folder only; bare ones search `node_modules` from this folder up to
    /// the root. Repeated requires of the same path return the same exports
    /// without touching storage, and a require that reaches a module still
    /// being evaluated gets its exports as they currently are.
    pub fn require(self: &Arc<Self>, specifier: &str) -> Result<Value> {
        let loader = self.loader()?;
        let found = loader.load(self, specifier)?;
        self.children.write().push(Arc::downgrade(&found));
        Ok(found.exports())
    }

    /// Resolve `specifier` as [`require`](Self::require) would, without
    /// loading anything.
    pub fn resolve(self: &Arc<Self>, specifier: &str) -> Result<Resolution> {
        self.loader()?.resolve(self, specifier)
    }

    /// `module.id`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `module.filename`
    pub fn filename(&self) -> &str {
        &self.id
    }

    /// `__dirname` of this module
    pub fn dirname(&self) -> &str {
        split_filename(&self.id).0
    }

    /// Folder relative requires start from
    pub fn folder(&self) -> &Arc<dyn Folder> {
        &self.folder
    }

    /// `module.loaded`
    pub fn loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Mark evaluation as complete
    pub fn mark_loaded(&self) {
        self.loaded.store(true, Ordering::Release);
    }

    /// `module.exports`
    pub fn exports(&self) -> Value {
        self.exports.read().clone()
    }

    /// `module.exports = value`
    pub fn set_exports(&self, value: Value) {
        *self.exports.write() = value;
    }

    /// `module.parent`; `None` for the root
    pub fn parent(&self) -> Option<Arc<Module>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// `module.children`, in the order the requires happened
    pub fn children(&self) -> Vec<Arc<Module>> {
        self.children.read().iter().filter_map(Weak::upgrade).collect()
    }

    /// `require.main`: the root module of this tree
    pub fn main(&self) -> Option<Arc<Module>> {
        self.main.upgrade()
    }

    /// Returns true for the root module
    pub fn is_main(&self) -> bool {
        self.installation.is_some()
    }

    /// Keys currently in the installation's cache
    pub fn cache_keys(&self) -> Vec<String> {
        self.loader
            .upgrade()
            .map(|loader| loader.cache().keys())
            .unwrap_or_default()
    }

    /// Inspect the installation's cache
    pub fn with_cache<R>(&self, inspect: impl FnOnce(&ModuleCache) -> R) -> Result<R> {
        Ok(inspect(self.loader()?.cache()))
    }

    /// Globals visible to every module of the installation
    pub fn globals(&self) -> Option<Object> {
        self.loader
            .upgrade()
            .map(|loader| loader.globals().clone())
    }

    pub(crate) fn loader(&self) -> Result<Arc<ModuleLoader>> {
        self.loader.upgrade().ok_or_else(|| {
            warn!("{} outlived the installation that loaded it", self.id);
            RequireError::InstallationDropped
        })
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("loaded", &self.loaded())
            .field("parent", &self.parent().map(|p| p.id.clone()))
            .field("children", &self.children.read().len())
            .finish()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module cache for require()

use super::module::Module;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Resolved path to module mapping for one installation.
///
/// Entries are only ever added, except that a module whose evaluation failed
/// is taken back out so a later require starts over.
#[derive(Default)]
pub struct ModuleCache {
    /// Cache mapping absolute paths to modules
    cache: DashMap<String, Arc<Module>>,
}

impl ModuleCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached module by path
    pub fn get(&self, path: &str) -> Option<Arc<Module>> {
        self.cache.get(path).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a module is cached
    pub fn contains(&self, path: &str) -> bool {
        self.cache.contains_key(path)
    }

    /// Insert unless the path is already taken; returns whichever module
    /// ends up cached under `path`.
    pub(crate) fn insert_if_absent(&self, path: &str, module: Arc<Module>) -> Arc<Module> {
        match self.cache.entry(path.to_string()) {
            Entry::Occupied(existing) => Arc::clone(existing.get()),
            Entry::Vacant(slot) => Arc::clone(slot.insert(module).value()),
        }
    }

    /// Point an additional path at an already cached module
    pub(crate) fn alias(&self, path: &str, module: &Arc<Module>) {
        self.cache
            .entry(path.to_string())
            .or_insert_with(|| Arc::clone(module));
    }

    /// Drop every path that maps to `module`
    pub(crate) fn discard(&self, module: &Arc<Module>) {
        self.cache.retain(|_, cached| !Arc::ptr_eq(cached, module));
    }

    /// Get all cached paths, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Get the number of cached paths
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl std::fmt::Debug for ModuleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::{Folder, ResourceBundle, ResourceFolder};
    use crate::module_system::Require;

    fn modules() -> (Arc<Module>, Arc<Module>, Arc<Module>) {
        let folder: Arc<dyn Folder> = Arc::new(ResourceFolder::create(ResourceBundle::new()));
        let root = Require::builder(Arc::clone(&folder)).install().unwrap();
        let a = root.create_child(Arc::clone(&folder), "/a.js");
        let b = root.create_child(folder, "/b.js");
        (root, a, b)
    }

    #[test]
    fn test_first_insert_wins() {
        let (_root, a, b) = modules();
        let cache = ModuleCache::new();
        assert!(Arc::ptr_eq(&cache.insert_if_absent("/a.js", Arc::clone(&a)), &a));
        assert!(Arc::ptr_eq(&cache.insert_if_absent("/a.js", b), &a));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_discard_removes_aliases() {
        let (_root, a, b) = modules();
        let cache = ModuleCache::new();
        cache.insert_if_absent("/a.js", Arc::clone(&a));
        cache.alias("/a", &a);
        cache.insert_if_absent("/b.js", Arc::clone(&b));
        assert_eq!(cache.keys(), vec!["/a", "/a.js", "/b.js"]);

        cache.discard(&a);
        assert_eq!(cache.keys(), vec!["/b.js"]);
        assert!(!cache.contains("/a"));
    }

    #[test]
    fn test_alias_keeps_existing_entry() {
        let (_root, a, b) = modules();
        let cache = ModuleCache::new();
        cache.alias("/x", &a);
        cache.alias("/x", &b);
        assert!(Arc::ptr_eq(&cache.get("/x").unwrap(), &a));
    }
}

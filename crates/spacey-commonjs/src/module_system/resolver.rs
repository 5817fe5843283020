// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module path resolution (CommonJS algorithm)

use super::cache::ModuleCache;
use super::handler::{HandlerRegistry, UnitKind};
use super::module::Module;
use super::paths::Specifier;
use crate::config::RequireOptions;
use crate::error::{RequireError, Result};
use crate::folder::Folder;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Which step of the search produced a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The name itself, or the name plus `.js` / `.json`
    DirectFile,
    /// `main` of the folder's package manifest
    PackageMain,
    /// `index.js` in the folder
    IndexJs,
    /// `index.json` in the folder
    IndexJson,
    /// An earlier identical request, served from the cache
    Cached,
}

impl Strategy {
    /// Folder-as-module strategies, in the order they are tried
    const DIRECTORY: [Strategy; 3] = [Strategy::PackageMain, Strategy::IndexJs, Strategy::IndexJson];
}

/// Outcome of `require.resolve`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved absolute path (the cache key)
    pub path: String,
    /// Strategy that found it
    pub strategy: Strategy,
}

/// A file found in storage that is not in the cache yet.
#[derive(Debug)]
pub(crate) struct Unit {
    /// Folder containing the file
    pub folder: Arc<dyn Folder>,
    /// Resolved absolute path
    pub path: String,
    pub source: String,
    pub kind: UnitKind,
}

#[derive(Debug)]
pub(crate) enum Target {
    Cached(Arc<Module>),
    Unit(Unit),
}

impl Target {
    pub fn path(&self) -> &str {
        match self {
            Target::Cached(module) => module.filename(),
            Target::Unit(unit) => &unit.path,
        }
    }
}

/// A successful search.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub strategy: Strategy,
    /// Requested location before extension inference or folder fallback
    pub alias: String,
    pub target: Target,
}

/// Minimal package.json structure for resolution
#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    main: Option<serde_json::Value>,
}

/// Walk `segments` from `from`: `.` stays, `..` goes to the parent, anything
/// else opens a subfolder. `None` as soon as a step has nowhere to go.
pub(crate) fn resolve_folder(
    from: &Arc<dyn Folder>,
    segments: &[&str],
) -> Result<Option<Arc<dyn Folder>>> {
    let mut current = Arc::clone(from);
    for segment in segments {
        let next = match *segment {
            "" => return Err(RequireError::EmptySegment),
            "." => continue,
            ".." => current.parent(),
            name => current.folder(name),
        };
        match next {
            Some(folder) => current = folder,
            None => {
                trace!("No folder '{}' under {}", segment, current.path());
                return Ok(None);
            }
        }
    }
    Ok(Some(current))
}

/// Resolver bound to one installation's cache, handlers and options
pub(crate) struct ModuleResolver<'a> {
    cache: &'a ModuleCache,
    handlers: &'a HandlerRegistry,
    options: &'a RequireOptions,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(
        cache: &'a ModuleCache,
        handlers: &'a HandlerRegistry,
        options: &'a RequireOptions,
    ) -> Self {
        Self {
            cache,
            handlers,
            options,
        }
    }

    /// Resolve a specifier requested from `base`
    pub fn resolve(&self, base: &Arc<dyn Folder>, specifier: &Specifier<'_>) -> Result<Option<Resolved>> {
        let mut visited = Vec::new();

        if specifier.is_prefixed() {
            return self.resolve_from(base, specifier, &mut visited);
        }

        // Bare names only ever resolve through node_modules folders
        let mut current = Some(Arc::clone(base));
        while let Some(folder) = current {
            if let Some(node_modules) = folder.folder(&self.options.node_modules) {
                if let Some(found) = self.resolve_from(&node_modules, specifier, &mut visited)? {
                    return Ok(Some(found));
                }
            }
            current = folder.parent();
        }

        Ok(None)
    }

    /// Full resolution of `specifier` rooted at `base`
    fn resolve_from(
        &self,
        base: &Arc<dyn Folder>,
        specifier: &Specifier<'_>,
        visited: &mut Vec<String>,
    ) -> Result<Option<Resolved>> {
        let (folder, name) = if specifier.names_folder() {
            (resolve_folder(base, specifier.segments())?, None)
        } else {
            (resolve_folder(base, specifier.folders())?, Some(specifier.name()))
        };
        let Some(folder) = folder else {
            return Ok(None);
        };

        let alias = match name {
            Some(name) => format!("{}{}", folder.path(), name),
            None => folder.path().to_string(),
        };
        if let Some(module) = self.cache.get(&alias) {
            debug!("Cache hit for {}", alias);
            return Ok(Some(Resolved {
                strategy: Strategy::Cached,
                alias,
                target: Target::Cached(module),
            }));
        }

        let found = match name {
            Some(name) => self.resolve_name(&folder, name, visited)?,
            None => self.resolve_directory(&folder, visited)?,
        };
        Ok(found.map(|(strategy, target)| Resolved {
            strategy,
            alias,
            target,
        }))
    }

    /// Files first, then the name as a folder
    fn resolve_name(
        &self,
        folder: &Arc<dyn Folder>,
        name: &str,
        visited: &mut Vec<String>,
    ) -> Result<Option<(Strategy, Target)>> {
        let direct = [
            name.to_string(),
            format!("{}.js", name),
            format!("{}.json", name),
        ];
        for candidate in &direct {
            if let Some(target) = self.try_file(folder, candidate) {
                return Ok(Some((Strategy::DirectFile, target)));
            }
        }

        match folder.folder(name) {
            Some(dir) => self.resolve_directory(&dir, visited),
            None => Ok(None),
        }
    }

    /// Folder-as-module: package main, then index.js, then index.json
    fn resolve_directory(
        &self,
        dir: &Arc<dyn Folder>,
        visited: &mut Vec<String>,
    ) -> Result<Option<(Strategy, Target)>> {
        if visited.iter().any(|path| path == dir.path()) {
            trace!("{} is already being resolved as a folder", dir.path());
            return Ok(None);
        }
        visited.push(dir.path().to_string());

        let mut found = None;
        for strategy in Strategy::DIRECTORY {
            let target = match strategy {
                Strategy::PackageMain => self.package_main(dir, visited)?,
                Strategy::IndexJs => self.try_file(dir, "index.js"),
                Strategy::IndexJson => self.try_file(dir, "index.json"),
                Strategy::DirectFile | Strategy::Cached => None,
            };
            if let Some(target) = target {
                found = Some((strategy, target));
                break;
            }
        }

        visited.pop();
        Ok(found)
    }

    /// Follow a string `main` in the folder's manifest, resolving it like a
    /// specifier relative to the folder (it may omit the extension or name
    /// another folder).
    fn package_main(&self, dir: &Arc<dyn Folder>, visited: &mut Vec<String>) -> Result<Option<Target>> {
        let manifest = &self.options.package_manifest;
        let Some(content) = dir.file(manifest) else {
            return Ok(None);
        };

        let main = match serde_json::from_str::<PackageJson>(&content) {
            Ok(PackageJson {
                main: Some(serde_json::Value::String(main)),
            }) => main,
            Ok(_) => return Ok(None),
            Err(e) => {
                warn!("Ignoring unparsable {}{}: {}", dir.path(), manifest, e);
                return Ok(None);
            }
        };

        let Ok(specifier) = Specifier::parse(&main) else {
            warn!("Ignoring invalid main '{}' in {}{}", main, dir.path(), manifest);
            return Ok(None);
        };
        Ok(self
            .resolve_from(dir, &specifier, visited)?
            .map(|resolved| resolved.target))
    }

    /// One candidate file: cache first, then storage
    fn try_file(&self, folder: &Arc<dyn Folder>, filename: &str) -> Option<Target> {
        let path = format!("{}{}", folder.path(), filename);
        if let Some(module) = self.cache.get(&path) {
            debug!("Cache hit for {}", path);
            return Some(Target::Cached(module));
        }

        let Some(kind) = self.handlers.kind_for(filename) else {
            trace!("No handler for {}", path);
            return None;
        };
        let source = folder.file(filename)?;
        debug!("Resolved {} ({:?})", path, kind);
        Some(Target::Unit(Unit {
            folder: Arc::clone(folder),
            path,
            source,
            kind,
        }))
    }
}

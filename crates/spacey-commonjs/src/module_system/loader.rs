// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - compiles resolved files and keeps the cache

use super::cache::ModuleCache;
use super::handler::{HandlerRegistry, UnitKind};
use super::module::Module;
use super::paths::Specifier;
use super::resolver::{ModuleResolver, Resolution, Resolved, Target, Unit};
use super::scope::{Evaluator, Scope};
use crate::config::RequireOptions;
use crate::error::{RequireError, Result};
use crate::value::{Object, Value};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// State shared by every module of one installation
pub(crate) struct ModuleLoader {
    cache: ModuleCache,
    /// Every module created in this installation, in creation order.
    /// Child links are weak and stay valid after a cache discard.
    modules: Mutex<Vec<Arc<Module>>>,
    evaluator: Arc<dyn Evaluator>,
    handlers: HandlerRegistry,
    options: RequireOptions,
    globals: Object,
}

impl ModuleLoader {
    pub fn new(
        evaluator: Arc<dyn Evaluator>,
        handlers: HandlerRegistry,
        options: RequireOptions,
        globals: Object,
    ) -> Self {
        Self {
            cache: ModuleCache::new(),
            modules: Mutex::new(Vec::new()),
            evaluator,
            handlers,
            options,
            globals,
        }
    }

    /// Find, load if needed, and return the module `specifier` names.
    pub fn load(&self, requesting: &Arc<Module>, specifier: &str) -> Result<Arc<Module>> {
        let resolved = self.find(requesting, specifier)?;
        let module = match resolved.target {
            Target::Cached(module) => module,
            Target::Unit(unit) => self.instantiate(requesting, unit)?,
        };

        // Repeat requests for the same location skip the folder walk
        self.cache.alias(&resolved.alias, &module);
        Ok(module)
    }

    /// Run the search only
    pub fn resolve(&self, requesting: &Arc<Module>, specifier: &str) -> Result<Resolution> {
        let resolved = self.find(requesting, specifier)?;
        Ok(Resolution {
            path: resolved.target.path().to_string(),
            strategy: resolved.strategy,
        })
    }

    fn find(&self, requesting: &Arc<Module>, specifier: &str) -> Result<Resolved> {
        let spec = Specifier::parse(specifier)?;
        let resolver = ModuleResolver::new(&self.cache, &self.handlers, &self.options);
        let resolved = resolver
            .resolve(requesting.folder(), &spec)?
            .ok_or_else(|| RequireError::module_not_found(specifier))?;
        debug!(
            "'{}' from {} -> {} ({:?})",
            specifier,
            requesting.id(),
            resolved.target.path(),
            resolved.strategy
        );
        Ok(resolved)
    }

    /// Turn a freshly read file into a cached module
    fn instantiate(&self, requesting: &Arc<Module>, unit: Unit) -> Result<Arc<Module>> {
        match unit.kind.clone() {
            UnitKind::Custom(handler) => {
                let module = handler.compile(&unit.folder, &unit.path, &unit.source, requesting)?;
                Ok(self.cache.insert_if_absent(&unit.path, module))
            }
            UnitKind::Json => {
                let json: serde_json::Value =
                    serde_json::from_str(&unit.source).map_err(|source| RequireError::Json {
                        filename: unit.path.clone(),
                        source,
                    })?;
                let module = requesting.create_child(Arc::clone(&unit.folder), &unit.path);
                module.set_exports(Value::from_json(&json));
                module.mark_loaded();
                Ok(self.cache.insert_if_absent(&unit.path, module))
            }
            UnitKind::Script => self.evaluate(requesting, unit),
        }
    }

    /// Cache first, then evaluate, so a cyclic require finds the module
    /// and gets its exports as they stand.
    fn evaluate(&self, requesting: &Arc<Module>, unit: Unit) -> Result<Arc<Module>> {
        let module = requesting.create_child(Arc::clone(&unit.folder), &unit.path);
        let cached = self.cache.insert_if_absent(&unit.path, Arc::clone(&module));
        if !Arc::ptr_eq(&cached, &module) {
            return Ok(cached);
        }

        debug!("Evaluating {}", unit.path);
        let scope = Scope::new(Arc::clone(&module));
        if let Err(e) = self.evaluator.evaluate(&unit.source, &scope) {
            debug!("Evaluation of {} failed, dropping it from the cache", unit.path);
            self.cache.discard(&module);
            return Err(e);
        }

        module.mark_loaded();
        Ok(module)
    }

    /// Keep `module` alive for as long as the installation
    pub fn adopt(&self, module: &Arc<Module>) {
        self.modules.lock().push(Arc::clone(module));
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    pub fn options(&self) -> &RequireOptions {
        &self.options
    }

    pub fn globals(&self) -> &Object {
        &self.globals
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS require() installation

use super::handler::{FileHandler, HandlerRegistry};
use super::loader::ModuleLoader;
use super::module::Module;
use super::scope::{Evaluator, NoEvaluator};
use crate::config::RequireOptions;
use crate::error::Result;
use crate::folder::Folder;
use crate::value::{Object, Value};
use std::sync::Arc;
use tracing::debug;

/// Entry point for installing `require` over a root folder.
pub struct Require;

impl Require {
    /// Start configuring an installation rooted at `root`
    pub fn builder(root: Arc<dyn Folder>) -> RequireBuilder {
        RequireBuilder {
            root,
            evaluator: None,
            handlers: HandlerRegistry::default(),
            options: RequireOptions::default(),
            globals: Object::new(),
        }
    }

    /// Install with default options and return the root module.
    ///
    /// The root module is what hosted top-level code sees as `module`; its
    /// `require` and `exports` are the bindings to expose alongside it.
    pub fn enable(root: Arc<dyn Folder>, evaluator: Arc<dyn Evaluator>) -> Result<Arc<Module>> {
        Self::builder(root).evaluator(evaluator).install()
    }
}

/// Configures one isolated installation: its own cache, handlers and globals.
pub struct RequireBuilder {
    root: Arc<dyn Folder>,
    evaluator: Option<Arc<dyn Evaluator>>,
    handlers: HandlerRegistry,
    options: RequireOptions,
    globals: Object,
}

impl RequireBuilder {
    /// Evaluator running `.js` modules. May be shared between installations.
    pub fn evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Register a handler for its file endings
    pub fn handler(mut self, handler: Arc<dyn FileHandler>) -> Self {
        self.handlers.register(handler);
        self
    }

    /// Replace the resolution options
    pub fn options(mut self, options: RequireOptions) -> Self {
        self.options = options;
        self
    }

    /// Define a global visible to every module of the installation
    pub fn global(self, name: &str, value: impl Into<Value>) -> Self {
        self.globals.set(name, value);
        self
    }

    /// Create the cache and the root module
    pub fn install(self) -> Result<Arc<Module>> {
        self.options.validate()?;
        debug!(
            "Installing require at {} ({} handler endings)",
            self.root.path(),
            self.handlers.len()
        );
        let evaluator = self
            .evaluator
            .unwrap_or_else(|| Arc::new(NoEvaluator) as Arc<dyn Evaluator>);
        let loader = Arc::new(ModuleLoader::new(
            evaluator,
            self.handlers,
            self.options,
            self.globals,
        ));
        Ok(Module::root(self.root, loader))
    }
}

/// The require() function for CommonJS modules
pub fn require(module: &Arc<Module>, specifier: &str) -> Result<Value> {
    module.require(specifier)
}

/// require.resolve() - get the resolved path without loading
pub fn require_resolve(module: &Arc<Module>, specifier: &str) -> Result<String> {
    module.resolve(specifier).map(|resolution| resolution.path)
}

/// require.cache - cached paths mapped to their current exports
pub fn require_cache(module: &Arc<Module>) -> Result<Value> {
    let loader = module.loader()?;
    let cache = loader.cache();
    let obj = Object::new();

    for path in cache.keys() {
        if let Some(cached) = cache.get(&path) {
            obj.set(path, cached.exports());
        }
    }

    Ok(Value::Object(obj))
}

/// require.main - the root module of the tree
pub fn require_main(module: &Module) -> Option<Arc<Module>> {
    module.main()
}

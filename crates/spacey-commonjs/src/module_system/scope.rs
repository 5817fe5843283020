// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Evaluation bridge: the scope handed to hosted code

use super::module::Module;
use super::paths::split_filename;
use crate::error::{RequireError, Result};
use crate::value::Value;
use std::sync::Arc;

/// Runs module source text.
///
/// The evaluator reads and writes exports through the [`Scope`]; once
/// `evaluate` returns, whatever `module.exports` holds becomes the module's
/// exports. Nested `require` calls go through [`Scope::require`] and run to
/// completion before it returns.
pub trait Evaluator: Send + Sync {
    /// Evaluate `source` against `scope`
    fn evaluate(&self, source: &str, scope: &Scope) -> Result<()>;
}

impl<F> Evaluator for F
where
    F: Fn(&str, &Scope) -> Result<()> + Send + Sync,
{
    fn evaluate(&self, source: &str, scope: &Scope) -> Result<()> {
        self(source, scope)
    }
}

/// Evaluator used when an installation was given none.
pub(crate) struct NoEvaluator;

impl Evaluator for NoEvaluator {
    fn evaluate(&self, _source: &str, scope: &Scope) -> Result<()> {
        Err(RequireError::evaluation(
            scope.module().filename(),
            "no script evaluator installed",
        ))
    }
}

/// Bindings visible to one module's code: `module`, `exports`, `require`,
/// `__filename` and `__dirname`, plus the installation globals.
#[derive(Debug)]
pub struct Scope {
    module: Arc<Module>,
    exports: Value,
    filename: String,
    dirname: String,
}

impl Scope {
    /// Create the scope for a module, binding `exports` to its current exports
    pub fn new(module: Arc<Module>) -> Self {
        let (dirname, filename) = split_filename(module.filename());
        let (dirname, filename) = (dirname.to_string(), filename.to_string());
        Self {
            exports: module.exports(),
            module,
            filename,
            dirname,
        }
    }

    /// `module`
    pub fn module(&self) -> &Arc<Module> {
        &self.module
    }

    /// `exports`: the object bound at scope creation, even if code later
    /// replaces `module.exports`
    pub fn exports(&self) -> &Value {
        &self.exports
    }

    /// `module.exports = value`
    pub fn set_exports(&self, value: Value) {
        self.module.set_exports(value);
    }

    /// `require(specifier)`
    pub fn require(&self, specifier: &str) -> Result<Value> {
        self.module.require(specifier)
    }

    /// `require.resolve(specifier)`
    pub fn require_resolve(&self, specifier: &str) -> Result<String> {
        self.module.resolve(specifier).map(|r| r.path)
    }

    /// `require.main`
    pub fn main(&self) -> Option<Arc<Module>> {
        self.module.main()
    }

    /// `__filename`: the resolved path after its final separator
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// `__dirname`: the resolved path before its final separator
    pub fn dirname(&self) -> &str {
        &self.dirname
    }

    /// A global shared by every module of the installation
    pub fn global(&self, name: &str) -> Value {
        self.module
            .globals()
            .and_then(|globals| globals.get(name))
            .unwrap_or_default()
    }
}

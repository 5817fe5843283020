// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Shared fixtures for the integration tests.
//!
//! Module "source text" here is the name of a Rust closure registered on a
//! [`Scripts`] evaluator; evaluating a module runs that closure against the
//! module's scope.

#![allow(dead_code)]

use parking_lot::RwLock;
use spacey_commonjs::{Folder, Module, Require, RequireError, ResourceBundle, ResourceFolder, Result, Scope, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Script = Arc<dyn Fn(&Scope) -> Result<()> + Send + Sync>;

/// Evaluator dispatching on source text
#[derive(Clone, Default)]
pub struct Scripts {
    scripts: Arc<RwLock<HashMap<String, Script>>>,
    runs: Arc<AtomicUsize>,
}

impl Scripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the behaviour for source text `name`
    pub fn define<F>(&self, name: &str, script: F)
    where
        F: Fn(&Scope) -> Result<()> + Send + Sync + 'static,
    {
        self.scripts.write().insert(name.to_string(), Arc::new(script));
    }

    /// Number of evaluations so far
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl spacey_commonjs::Evaluator for Scripts {
    fn evaluate(&self, source: &str, scope: &Scope) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.read().get(source.trim()).cloned();
        match script {
            Some(script) => script(scope),
            None => Err(RequireError::evaluation(
                scope.module().filename(),
                format!("unknown script '{}'", source),
            )),
        }
    }
}

/// `exports[key] = value`
pub fn export(scope: &Scope, key: &str, value: impl Into<Value>) {
    scope
        .exports()
        .as_object()
        .expect("exports starts as an object")
        .set(key, value);
}

/// Folder wrapper counting file reads across a whole tree
#[derive(Debug, Clone)]
pub struct CountingFolder {
    inner: Arc<dyn Folder>,
    reads: Arc<AtomicUsize>,
}

impl CountingFolder {
    pub fn wrap(inner: Arc<dyn Folder>) -> (Arc<dyn Folder>, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let folder = CountingFolder {
            inner,
            reads: Arc::clone(&reads),
        };
        (Arc::new(folder), reads)
    }

    fn child(&self, inner: Arc<dyn Folder>) -> Arc<dyn Folder> {
        Arc::new(CountingFolder {
            inner,
            reads: Arc::clone(&self.reads),
        })
    }
}

impl Folder for CountingFolder {
    fn path(&self) -> &str {
        self.inner.path()
    }

    fn parent(&self) -> Option<Arc<dyn Folder>> {
        self.inner.parent().map(|p| self.child(p))
    }

    fn file(&self, name: &str) -> Option<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.file(name)
    }

    fn folder(&self, name: &str) -> Option<Arc<dyn Folder>> {
        self.inner.folder(name).map(|f| self.child(f))
    }
}

/// The standard tree used by most tests
pub struct Fixture {
    pub bundle: ResourceBundle,
    pub scripts: Scripts,
}

impl Fixture {
    pub fn new() -> Self {
        let bundle = ResourceBundle::new()
            .with("file1.js", "file1")
            .with("file2.json", r#"{ "file2": "file2" }"#)
            .with("node_modules/nmfile1.js", "nmfile1")
            .with("node_modules/nmsub1/nmsub1file1.js", "nmsub1file1")
            .with("sub1/sub1file1.js", "sub1file1")
            .with("sub1/node_modules/sub1nmfile1.js", "sub1nmfile1")
            .with("sub1/sub1/sub1sub1file1.js", "sub1sub1file1");

        let scripts = Scripts::new();
        for name in ["file1", "nmfile1", "nmsub1file1", "sub1file1", "sub1nmfile1", "sub1sub1file1"] {
            scripts.define(name, move |scope| {
                export(scope, name, name);
                Ok(())
            });
        }

        Self { bundle, scripts }
    }

    /// Add or replace a file
    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.bundle.insert(path, content);
        self
    }

    /// Add or replace a script
    pub fn script<F>(self, name: &str, script: F) -> Self
    where
        F: Fn(&Scope) -> Result<()> + Send + Sync + 'static,
    {
        self.scripts.define(name, script);
        self
    }

    pub fn root_folder(&self) -> Arc<dyn Folder> {
        Arc::new(ResourceFolder::create(self.bundle.clone()))
    }

    pub fn install(&self) -> Arc<Module> {
        Require::enable(self.root_folder(), Arc::new(self.scripts.clone())).unwrap()
    }

    /// Install over a folder that counts file reads
    pub fn install_counting(&self) -> (Arc<Module>, Arc<AtomicUsize>) {
        let (folder, reads) = CountingFolder::wrap(self.root_folder());
        let root = Require::enable(folder, Arc::new(self.scripts.clone())).unwrap();
        (root, reads)
    }
}

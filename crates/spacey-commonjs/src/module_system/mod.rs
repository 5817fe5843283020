// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS module system implementation
//!
//! - `require()` with `node_modules` lookup, extension inference and
//!   folder-as-module (`package.json` main, `index.js`, `index.json`)
//! - `module.exports` / `exports`, `module.parent` / `module.children`
//! - One cached module per resolved path; cyclic requires see partial exports
//! - Synchronous, re-entrant loading

mod cache;
mod handler;
mod loader;
mod module;
pub mod paths;
mod require;
mod resolver;
mod scope;

pub use cache::ModuleCache;
pub use handler::FileHandler;
pub use module::Module;
pub use require::{require, require_cache, require_main, require_resolve, Require, RequireBuilder};
pub use resolver::{Resolution, Strategy};
pub use scope::{Evaluator, Scope};

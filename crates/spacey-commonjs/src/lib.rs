// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-commonjs
//!
//! CommonJS `require()` for embedders: resolves a specifier to a file in a
//! [`Folder`], evaluates it once through a pluggable [`Evaluator`], caches it
//! by resolved path and returns its exports.
//!
//! - Relative and absolute specifiers (`./x`, `../x`, `/x`) resolve against
//!   the requesting module's folder
//! - Bare specifiers (`lodash`, `pkg/lib/x`) search `node_modules` folders
//!   from the requester up to the root
//! - `x`, `x.js`, `x.json`, then `x/` as a folder (`package.json` main,
//!   `index.js`, `index.json`)
//! - Cyclic requires return partially populated exports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spacey_commonjs::{Require, ResourceBundle, ResourceFolder, Scope};
//! use std::sync::Arc;
//!
//! let bundle = ResourceBundle::new().with("config.json", r#"{ "port": 8080 }"#);
//! let root = Require::enable(
//!     Arc::new(ResourceFolder::create(bundle)),
//!     Arc::new(|_source: &str, _scope: &Scope| Ok(())),
//! )?;
//! let config = root.require("./config")?;
//! assert_eq!(config.get("port"), 8080.0.into());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod folder;
pub mod module_system;
pub mod value;

// Re-exports
pub use config::RequireOptions;
pub use encoding_rs::Encoding;
pub use error::{RequireError, Result, MODULE_NOT_FOUND};
pub use folder::{FilesystemFolder, Folder, ResourceBundle, ResourceFolder};
pub use module_system::{
    require, require_cache, require_main, require_resolve, Evaluator, FileHandler, Module,
    ModuleCache, Require, RequireBuilder, Resolution, Scope, Strategy,
};
pub use value::{Array, NativeFunction, Object, Value};

/// Version of the spacey-commonjs crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the CommonJS module system

use thiserror::Error;

/// Result type for module system operations
pub type Result<T> = std::result::Result<T, RequireError>;

/// Machine-readable code carried by every module-not-found failure
pub const MODULE_NOT_FOUND: &str = "MODULE_NOT_FOUND";

/// Errors that can occur while resolving, loading or evaluating modules
#[derive(Debug, Error)]
pub enum RequireError {
    /// Module not found
    #[error("Cannot find module '{0}'")]
    ModuleNotFound(String),

    /// The evaluation bridge failed while running a module
    #[error("{message} in {filename}")]
    Evaluation {
        /// Resolved path of the module being evaluated
        filename: String,
        /// Failure reported by the evaluator
        message: String,
    },

    /// A JSON module could not be parsed
    #[error("JSON parse error in {filename}: {source}")]
    Json {
        /// Resolved path of the JSON module
        filename: String,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// A registered file handler failed to compile a module
    #[error("Handler for '{ending}' failed: {message}")]
    Handler {
        /// File ending the handler was registered for
        ending: String,
        /// Failure reported by the handler
        message: String,
    },

    /// An empty path segment reached folder navigation
    #[error("Empty path segment reached folder navigation")]
    EmptySegment,

    /// The root module owning this installation has been dropped
    #[error("Module installation has been dropped")]
    InstallationDropped,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RequireError {
    /// Create a module not found error
    pub fn module_not_found(specifier: impl Into<String>) -> Self {
        Self::ModuleNotFound(specifier.into())
    }

    /// Create an evaluation error for the given module
    pub fn evaluation(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Stable code observable by hosted code, if this error kind has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::ModuleNotFound(_) => Some(MODULE_NOT_FOUND),
            _ => None,
        }
    }

    /// Returns true if this is a module-not-found failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_not_found_code() {
        let err = RequireError::module_not_found("./invalid");
        assert_eq!(err.code(), Some("MODULE_NOT_FOUND"));
        assert_eq!(err.to_string(), "Cannot find module './invalid'");
    }

    #[test]
    fn test_evaluation_message_names_file() {
        let err = RequireError::evaluation("/file1.js", "bad thing");
        assert_eq!(err.to_string(), "bad thing in /file1.js");
        assert_eq!(err.code(), None);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-cjs - inspect CommonJS module resolution
//!
//! Installs `require` over a directory and reports where specifiers resolve.
//! No script engine is attached, so only JSON modules can be loaded.

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use spacey_commonjs::{
    Encoding, FilesystemFolder, Module, Require, RequireOptions, Resolution, VERSION,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "spacey-cjs",
    about = "Inspect CommonJS module resolution",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Folder the root module lives in
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// TOML file with resolution options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Encoding of module sources (any WHATWG label, e.g. windows-1252)
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print where each specifier resolves from the root
    Resolve {
        #[arg(required = true)]
        specifiers: Vec<String>,
    },
    /// Load a JSON module and print its exports
    Json { specifier: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Log directives for this binary and the library
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "spacey_cjs=debug,spacey_commonjs=debug"
    } else {
        "spacey_cjs=warn,spacey_commonjs=warn"
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let root = install(&cli.root, cli.config.as_deref(), &cli.encoding)?;

    match &cli.command {
        Command::Resolve { specifiers } => {
            for specifier in specifiers {
                let resolution = root.resolve(specifier)?;
                debug!("{} resolved via {:?}", specifier, resolution.strategy);
                println!("{} -> {}", specifier.cyan(), describe(&resolution));
            }
        }
        Command::Json { specifier } => {
            println!("{}", load_json(&root, specifier)?);
        }
    }
    Ok(())
}

/// Install `require` over `dir` with options from `config`, if given
fn install(dir: &Path, config: Option<&Path>, encoding: &str) -> anyhow::Result<Arc<Module>> {
    let options = match config {
        Some(path) => RequireOptions::from_toml_file(path)?,
        None => RequireOptions::default(),
    };
    let encoding = Encoding::for_label(encoding.as_bytes())
        .with_context(|| format!("unknown encoding '{}'", encoding))?;
    let folder = FilesystemFolder::create(dir)
        .with_context(|| format!("cannot use {} as the root folder", dir.display()))?
        .with_encoding(encoding);

    debug!("Root folder {}", dir.display());
    Ok(Require::builder(Arc::new(folder)).options(options).install()?)
}

fn describe(resolution: &Resolution) -> String {
    format!("{} ({:?})", resolution.path, resolution.strategy)
}

/// Require `specifier` and render its exports as pretty JSON
fn load_json(root: &Arc<Module>, specifier: &str) -> anyhow::Result<String> {
    let exports = root.require(specifier)?;
    Ok(serde_json::to_string_pretty(&exports.to_json())?)
}

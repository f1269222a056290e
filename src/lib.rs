//! # cxdetect - VSCode compiler setup for C/C++ projects
//!
//! Finds the C/C++ compilers installed on this machine (MSVC, GCC, Clang),
//! lets you pick one, and points VSCode IntelliSense at it by writing
//! `.vscode/c_cpp_properties.json` and merging into `.vscode/settings.json`.
//!
//! ## Quick Start
//!
//! ```bash
//! # From the project root
//! cxdetect
//! ```
//!
//! ## Module Organization
//!
//! - [`toolchain`] - Compiler probes and candidate list
//! - [`commands`] - Selection prompt and the detect pipeline
//! - [`ide`] - VSCode configuration writer
//! - [`config`] - Document schemas and run options

/// CLI command handlers.
pub mod commands;

/// Output document schemas and defaults.
pub mod config;

/// IDE configuration writer (VSCode).
pub mod ide;

/// Compiler detection.
pub mod toolchain;

/// Terminal status output.
pub mod ui;

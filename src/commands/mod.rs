//! CLI command handlers
//!
//! `detect` drives the whole run; `toolchain` holds the selection prompt.

pub mod detect;
pub mod toolchain;

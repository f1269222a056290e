//! # cxdetect CLI Entry Point
//!
//! Running `cxdetect` with no arguments detects compilers and writes the
//! VSCode configuration for the current directory. Flags only adjust where
//! and how loudly that happens.
//!
//! Exit status is 0 on success and 1 on cancellation or any error.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use cxdetect::commands;
use cxdetect::commands::toolchain::SelectError;
use cxdetect::config::DetectOptions;
use cxdetect::toolchain::HostOs;
use cxdetect::ui;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

// Status glyphs need a UTF-8 console on Windows
#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "cxdetect")]
#[command(about = "Detect C/C++ compilers and configure VSCode IntelliSense", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Project root containing (or receiving) the .vscode directory [default: current directory]
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Report every probe attempt
    #[arg(short, long)]
    verbose: bool,
    /// Print the generated files instead of writing them
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_options(self) -> Result<DetectOptions> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        Ok(DetectOptions {
            root,
            verbose: self.verbose,
            dry_run: self.dry_run,
        })
    }
}

fn main() {
    enable_windows_utf8_console();

    let cli = Cli::parse();
    let os = HostOs::current();

    let result = cli
        .into_options()
        .and_then(|options| commands::detect::run_detect(&options, os));

    if let Err(e) = result {
        if let Some(SelectError::Cancelled) = e.downcast_ref::<SelectError>() {
            println!("\n{}", SelectError::Cancelled);
            std::process::exit(1);
        }
        ui::error(&format!("Error updating configuration: {:#}", e));
        std::process::exit(1);
    }
}

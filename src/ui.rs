//! Terminal status output.
//!
//! Every line the tool prints goes through here so the glyph and colour
//! conventions stay consistent:
//!
//! - `⚙️` cyan - a step is starting
//! - `✓` green - something succeeded
//! - `!` yellow - warning, nothing failed
//! - `x` red - fatal error (stderr)
//! - `·` dimmed - verbose-only detail

use colored::*;

pub fn step(msg: &str) {
    println!("{} {}", "⚙️".cyan(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn warn(msg: &str) {
    println!("{} {}", "!".yellow(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "x".red(), msg.red());
}

/// Indented key/value line used in summaries
pub fn field(key: &str, value: &str) {
    println!("   {} {}", format!("{}:", key).bold(), value.cyan());
}

pub fn detail(msg: &str) {
    println!("   {} {}", "·".dimmed(), msg.dimmed());
}

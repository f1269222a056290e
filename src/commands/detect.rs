//! Detect command handler
//!
//! The whole pipeline: probe compilers, pick one, write the VSCode files.

use anyhow::{Context, Result};
use std::io::{self, IsTerminal};

use crate::commands::toolchain::{
    self as selector, ChoiceInput, InquireInput, LineInput, SelectError,
};
use crate::config::DetectOptions;
use crate::ide;
use crate::toolchain::{self, CompilerCandidate, HostOs, Prober, SystemRunner};
use crate::ui;

/// Prompt with inquire on a terminal, plain line reads otherwise.
fn choice_input() -> Box<dyn ChoiceInput> {
    if io::stdin().is_terminal() {
        Box::new(InquireInput)
    } else {
        Box::new(LineInput::new(io::stdin().lock()))
    }
}

/// Exit with status 1 on SIGINT while the user is being asked.
///
/// inquire reports Ctrl-C itself on a terminal, but a piped prompt is blocked
/// in `read_line` and would otherwise die by signal.
fn cancel_on_interrupt() -> Result<()> {
    ctrlc::set_handler(|| {
        println!("\n{}", SelectError::Cancelled);
        std::process::exit(1);
    })
    .context("Failed to install interrupt handler")
}

/// Probe this machine and let the user pick a compiler.
pub fn select_compiler(os: HostOs, verbose: bool) -> Result<CompilerCandidate> {
    let runner = SystemRunner::default();
    let prober = Prober::new(&runner, verbose);
    let candidates = toolchain::find_all_compilers(os, &prober);

    if candidates.len() > 1 {
        cancel_on_interrupt()?;
    }

    let mut input = choice_input();
    let chosen = selector::select_compiler(&candidates, input.as_mut(), &mut io::stdout())?;
    Ok(chosen)
}

/// Write (or with `dry_run`, print) the configuration for `selection`.
pub fn apply_selection(
    options: &DetectOptions,
    selection: &CompilerCandidate,
    os: HostOs,
) -> Result<()> {
    if options.dry_run {
        let paths = ide::VscodePaths::new(&options.root);
        let config = ide::prepare_config(&paths, selection, os)?;
        ui::warn("Dry run: nothing written");
        println!("{}", paths.cpp_properties.display());
        println!("{}", ide::to_json_pretty(&config.cpp_properties)?);
        println!("{}", paths.settings.display());
        println!("{}", ide::to_json_pretty(&config.settings)?);
        return Ok(());
    }

    ide::update_vscode_config(&options.root, selection, os).with_context(|| {
        format!(
            "Failed to update {}",
            options.root.join(ide::VSCODE_DIR).display()
        )
    })?;

    ui::success(&format!("VSCode configurations updated for {}", os));
    ui::field("Compiler selected", &selection.path);
    ui::field("IntelliSense mode", &selection.mode);
    ui::success(&format!(
        "Updated both {} and {}",
        ide::CPP_PROPERTIES_FILE,
        ide::SETTINGS_FILE
    ));
    Ok(())
}

/// Run the full detect-and-configure pipeline
pub fn run_detect(options: &DetectOptions, os: HostOs) -> Result<()> {
    ui::step("Detecting compilers and updating VSCode configuration...");
    if options.verbose {
        ui::detail(&format!("host: {}", os));
        ui::detail(&format!("project root: {}", options.root.display()));
    }

    let selection = select_compiler(os, options.verbose)?;
    apply_selection(options, &selection, os)?;

    if !options.dry_run {
        ui::success("Configuration updated successfully!");
    }
    Ok(())
}

//! Compiler discovery
//!
//! Probes each compiler family independently and assembles the candidate
//! list offered to the user. Probing is best-effort: a compiler that is
//! installed but not detected is acceptable, a false positive is not.

pub mod probe;
pub mod types;
pub mod windows;

pub use probe::{CommandOutcome, CommandRunner, SystemRunner};
pub use types::{CompilerCandidate, CompilerFamily, HostOs, ProbeFailure};

use crate::ui;
use std::path::PathBuf;

/// cl.exe assumed on Windows when nothing is detected
pub const DEFAULT_MSVC_PATH: &str = "C:/Program Files (x86)/Microsoft Visual Studio/2019/Community/VC/Tools/MSVC/14.29.30133/bin/Hostx64/x64/cl.exe";
/// Compiler assumed on macOS when nothing is detected
pub const DEFAULT_MACOS_PATH: &str = "/usr/bin/clang++";
/// Compiler assumed on Linux when nothing is detected
pub const DEFAULT_LINUX_PATH: &str = "/usr/bin/g++";

/// Everything the probes need from the outside world.
pub struct Prober<'a> {
    pub runner: &'a dyn CommandRunner,
    /// Roots searched for Visual Studio installs
    pub msvc_roots: Vec<PathBuf>,
    pub verbose: bool,
}

impl<'a> Prober<'a> {
    pub fn new(runner: &'a dyn CommandRunner, verbose: bool) -> Self {
        Self {
            runner,
            msvc_roots: windows::default_roots(),
            verbose,
        }
    }

    /// Locate one compiler family. Never fails; absence is `None`.
    pub fn locate(&self, family: CompilerFamily, os: HostOs) -> Option<String> {
        let found = match family {
            CompilerFamily::Msvc => windows::find_msvc(os, &self.msvc_roots),
            CompilerFamily::Gcc | CompilerFamily::Clang => {
                probe::find_by_banner(self.runner, family, |name, reason| {
                    if self.verbose {
                        ui::detail(&format!("{} rejected: {}", name, reason));
                    }
                })
            }
        };

        if self.verbose {
            match &found {
                Some(path) => ui::detail(&format!("{:?} found at {}", family, path)),
                None => ui::detail(&format!("{:?} not found", family)),
            }
        }
        found
    }
}

/// The synthetic candidate used when no compiler was detected. Never verified.
pub fn fallback_candidate(os: HostOs) -> CompilerCandidate {
    let (path, display_name) = match os {
        HostOs::Windows => (DEFAULT_MSVC_PATH, "Default MSVC"),
        HostOs::MacOs => (DEFAULT_MACOS_PATH, "Default Clang"),
        HostOs::Linux => (DEFAULT_LINUX_PATH, "Default GCC"),
    };
    CompilerCandidate {
        path: path.to_string(),
        mode: os.intellisense_mode(os.default_family()),
        display_name: display_name.to_string(),
    }
}

/// Probe every family in priority order (MSVC, GCC, Clang).
///
/// The result is never empty: with nothing detected it holds exactly the
/// platform fallback.
pub fn find_all_compilers(os: HostOs, prober: &Prober<'_>) -> Vec<CompilerCandidate> {
    let mut compilers: Vec<CompilerCandidate> = CompilerFamily::ALL
        .iter()
        .filter_map(|&family| {
            prober
                .locate(family, os)
                .map(|path| CompilerCandidate::detected(os, family, path))
        })
        .collect();

    if compilers.is_empty() {
        compilers.push(fallback_candidate(os));
    }
    compilers
}

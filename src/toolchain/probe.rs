//! Version-query probes for GCC and Clang
//!
//! Each candidate executable is run with `--version`. A candidate is accepted
//! only when it exits successfully AND its banner names the expected family,
//! so wrappers that happen to exit 0 are not mistaken for a compiler.

use super::types::{CompilerFamily, ProbeFailure};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long a single `--version` query may run
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Names tried for GCC, in order
pub const GCC_CANDIDATES: &[&str] = &["g++", "g++-11", "g++-10", "g++-9", "g++-8", "gcc", "g++"];

/// Names tried for Clang, in order
pub const CLANG_CANDIDATES: &[&str] = &[
    "clang++",
    "clang++-14",
    "clang++-13",
    "clang++-12",
    "clang++-11",
    "clang",
];

/// Result of running an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Exited with status zero
    Success { stdout: String },
    Failure(ProbeFailure),
}

/// Runs external commands on behalf of the probes.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutcome;
}

/// Spawns real processes, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    pub timeout: Duration,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self {
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl SystemRunner {
    fn run_inner(&self, program: &str, args: &[&str]) -> Result<String, ProbeFailure> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes while waiting so a chatty child never blocks on a full pipe
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    // Readers are left detached: a grandchild may still hold the pipes
                    return Err(ProbeFailure::Timeout);
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(e.into());
                }
            }
        };

        let stdout = stdout.join().unwrap_or_default();
        let _ = stderr.join();

        if !status.success() {
            return Err(ProbeFailure::NonZeroExit(status.code()));
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Read a child pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutcome {
        match self.run_inner(program, args) {
            Ok(stdout) => CommandOutcome::Success { stdout },
            Err(reason) => CommandOutcome::Failure(reason),
        }
    }
}

/// Does this `--version` banner identify the given family?
pub fn banner_matches(family: CompilerFamily, stdout: &str) -> bool {
    match family {
        CompilerFamily::Gcc => {
            stdout.contains("Free Software") || stdout.to_lowercase().contains("gcc")
        }
        CompilerFamily::Clang => stdout.to_lowercase().contains("clang"),
        // cl.exe is located on disk, never by banner
        CompilerFamily::Msvc => false,
    }
}

/// Candidate executable names for a banner-probed family.
pub fn candidate_names(family: CompilerFamily) -> &'static [&'static str] {
    match family {
        CompilerFamily::Gcc => GCC_CANDIDATES,
        CompilerFamily::Clang => CLANG_CANDIDATES,
        CompilerFamily::Msvc => &[],
    }
}

/// Query one candidate: success plus a matching banner, or the reason it was rejected.
pub fn query_candidate(
    runner: &dyn CommandRunner,
    family: CompilerFamily,
    name: &str,
) -> Result<(), ProbeFailure> {
    match runner.run(name, &["--version"]) {
        CommandOutcome::Success { stdout } if banner_matches(family, &stdout) => Ok(()),
        CommandOutcome::Success { .. } => Err(ProbeFailure::Unrecognized),
        CommandOutcome::Failure(reason) => Err(reason),
    }
}

/// Try every candidate name for `family`; the first accepted name wins.
///
/// `on_reject` sees each rejected name with its reason (used for verbose output).
pub fn find_by_banner(
    runner: &dyn CommandRunner,
    family: CompilerFamily,
    mut on_reject: impl FnMut(&str, &ProbeFailure),
) -> Option<String> {
    for &name in candidate_names(family) {
        match query_candidate(runner, family, name) {
            Ok(()) => return Some(name.to_string()),
            Err(reason) => on_reject(name, &reason),
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned outcomes keyed by program name; anything else is `NotFound`.
    #[derive(Default)]
    pub struct ScriptedRunner {
        pub outcomes: HashMap<String, CommandOutcome>,
        pub calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        pub fn with(mut self, program: &str, outcome: CommandOutcome) -> Self {
            self.outcomes.insert(program.to_string(), outcome);
            self
        }

        pub fn banner(self, program: &str, stdout: &str) -> Self {
            self.with(
                program,
                CommandOutcome::Success {
                    stdout: stdout.to_string(),
                },
            )
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, program: &str, _args: &[&str]) -> CommandOutcome {
            self.calls.borrow_mut().push(program.to_string());
            self.outcomes
                .get(program)
                .cloned()
                .unwrap_or(CommandOutcome::Failure(ProbeFailure::NotFound))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedRunner;
    use super::*;

    const GCC_BANNER: &str = "g++ (Ubuntu 11.4.0-1ubuntu1~22.04) 11.4.0\n\
        Copyright (C) 2021 Free Software Foundation, Inc.\n";
    const CLANG_BANNER: &str = "Ubuntu clang version 14.0.0-1ubuntu1.1\n\
        Target: x86_64-pc-linux-gnu\n";
    const APPLE_CLANG_BANNER: &str = "Apple clang version 15.0.0 (clang-1500.1.0.2.5)\n";

    #[test]
    fn test_banner_matches_gcc() {
        assert!(banner_matches(CompilerFamily::Gcc, GCC_BANNER));
        assert!(banner_matches(CompilerFamily::Gcc, "x86_64-w64-mingw32-GCC 13\n"));
        assert!(!banner_matches(CompilerFamily::Gcc, CLANG_BANNER));
    }

    #[test]
    fn test_banner_matches_clang_case_insensitive() {
        assert!(banner_matches(CompilerFamily::Clang, CLANG_BANNER));
        assert!(banner_matches(CompilerFamily::Clang, "CLANG version 17"));
        assert!(!banner_matches(CompilerFamily::Clang, GCC_BANNER));
    }

    #[test]
    fn test_first_accepted_candidate_wins() {
        let runner = ScriptedRunner::default()
            .banner("g++-10", GCC_BANNER)
            .banner("gcc", GCC_BANNER);
        let found = find_by_banner(&runner, CompilerFamily::Gcc, |_, _| {});
        assert_eq!(found.as_deref(), Some("g++-10"));
        assert_eq!(*runner.calls.borrow(), vec!["g++", "g++-11", "g++-10"]);
    }

    #[test]
    fn test_zero_exit_without_banner_is_rejected() {
        // On macOS `g++` is clang in disguise
        let runner = ScriptedRunner::default().banner("g++", APPLE_CLANG_BANNER);
        let mut rejected = Vec::new();
        let found = find_by_banner(&runner, CompilerFamily::Gcc, |name, reason| {
            rejected.push((name.to_string(), reason.clone()))
        });
        assert_eq!(found, None);
        assert_eq!(
            rejected[0],
            ("g++".to_string(), ProbeFailure::Unrecognized)
        );
        assert_eq!(rejected.len(), GCC_CANDIDATES.len());
    }

    #[test]
    fn test_failures_are_skipped() {
        let runner = ScriptedRunner::default()
            .with("clang++", CommandOutcome::Failure(ProbeFailure::Timeout))
            .with(
                "clang++-14",
                CommandOutcome::Failure(ProbeFailure::NonZeroExit(Some(1))),
            )
            .banner("clang", CLANG_BANNER);
        let found = find_by_banner(&runner, CompilerFamily::Clang, |_, _| {});
        assert_eq!(found.as_deref(), Some("clang"));
    }

    #[test]
    fn test_msvc_has_no_banner_candidates() {
        let runner = ScriptedRunner::default();
        assert_eq!(find_by_banner(&runner, CompilerFamily::Msvc, |_, _| {}), None);
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_system_runner_missing_program() {
        let runner = SystemRunner::default();
        let outcome = runner.run("cxdetect-definitely-not-a-real-binary", &["--version"]);
        assert_eq!(outcome, CommandOutcome::Failure(ProbeFailure::NotFound));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout() {
        let runner = SystemRunner::default();
        let outcome = runner.run("sh", &["-c", "echo 'gcc (fake) 1.0'"]);
        assert_eq!(
            outcome,
            CommandOutcome::Success {
                stdout: "gcc (fake) 1.0\n".to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_large_output_does_not_stall() {
        let runner = SystemRunner {
            timeout: Duration::from_secs(3),
        };
        // Far more than a pipe buffer on stderr, then the banner on stdout
        let script = "head -c 200000 /dev/zero | tr '\\0' x >&2; \
                      head -c 200000 /dev/zero | tr '\\0' y; echo; echo gcc";
        match runner.run("sh", &["-c", script]) {
            CommandOutcome::Success { stdout } => {
                assert!(stdout.ends_with("\ngcc\n"));
                assert!(stdout.len() > 200000);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_non_zero_exit() {
        let runner = SystemRunner::default();
        let outcome = runner.run("sh", &["-c", "exit 3"]);
        assert_eq!(
            outcome,
            CommandOutcome::Failure(ProbeFailure::NonZeroExit(Some(3)))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_timeout() {
        let runner = SystemRunner {
            timeout: Duration::from_millis(100),
        };
        let started = Instant::now();
        let outcome = runner.run("sh", &["-c", "sleep 5"]);
        assert_eq!(outcome, CommandOutcome::Failure(ProbeFailure::Timeout));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}

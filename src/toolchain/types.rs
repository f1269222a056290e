use std::fmt;

/// Compiler families the detector knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFamily {
    /// Microsoft Visual C++ (cl.exe)
    Msvc,
    /// GNU Compiler Collection (g++ / gcc)
    Gcc,
    /// Clang/LLVM (clang++ / clang)
    Clang,
}

impl CompilerFamily {
    /// Probe order. MSVC is only ever found on Windows.
    pub const ALL: [CompilerFamily; 3] = [
        CompilerFamily::Msvc,
        CompilerFamily::Gcc,
        CompilerFamily::Clang,
    ];

    fn tag(&self) -> &'static str {
        match self {
            CompilerFamily::Msvc => "msvc",
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Clang => "clang",
        }
    }

    /// Name shown in the selection list
    pub fn display_name(&self) -> &'static str {
        match self {
            CompilerFamily::Msvc => "MSVC Compiler",
            CompilerFamily::Gcc => "GCC Compiler",
            CompilerFamily::Clang => "Clang Compiler",
        }
    }
}

/// The host operating system, as far as editor configuration cares.
///
/// Detected once in `main` and passed down explicitly so every decision
/// that depends on it can be exercised against a simulated host in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    /// Anything that is neither Windows nor macOS.
    Linux,
}

impl HostOs {
    pub fn current() -> Self {
        Self::from_os_str(std::env::consts::OS)
    }

    pub fn from_os_str(os: &str) -> Self {
        match os {
            "windows" => HostOs::Windows,
            "macos" => HostOs::MacOs,
            _ => HostOs::Linux,
        }
    }

    /// Configuration name written into `c_cpp_properties.json`
    pub fn config_name(&self) -> &'static str {
        match self {
            HostOs::Windows => "Windows",
            HostOs::MacOs => "macOS",
            HostOs::Linux => "Linux",
        }
    }

    /// Kernel-style system name used in the summary line
    pub fn system_name(&self) -> &'static str {
        match self {
            HostOs::Windows => "Windows",
            HostOs::MacOs => "Darwin",
            HostOs::Linux => "Linux",
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::MacOs => "macos",
            HostOs::Linux => "linux",
        }
    }

    /// IntelliSense mode for a compiler family on this host, e.g. `linux-gcc-x64`.
    pub fn intellisense_mode(&self, family: CompilerFamily) -> String {
        format!("{}-{}-x64", self.tag(), family.tag())
    }

    /// The compiler family assumed when nothing is detected.
    pub fn default_family(&self) -> CompilerFamily {
        match self {
            HostOs::Windows => CompilerFamily::Msvc,
            HostOs::MacOs => CompilerFamily::Clang,
            HostOs::Linux => CompilerFamily::Gcc,
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.system_name())
    }
}

/// A detected (or defaulted) compiler offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCandidate {
    /// Absolute path, or a bare executable name resolved through PATH
    pub path: String,
    /// IntelliSense mode tag, e.g. `windows-msvc-x64`
    pub mode: String,
    pub display_name: String,
}

impl CompilerCandidate {
    pub fn detected(os: HostOs, family: CompilerFamily, path: String) -> Self {
        Self {
            path,
            mode: os.intellisense_mode(family),
            display_name: family.display_name().to_string(),
        }
    }
}

impl fmt::Display for CompilerCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_name, self.path)
    }
}

/// Why a single probe attempt did not yield a compiler.
///
/// Always recovered locally; the candidate is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Executable not found on PATH
    NotFound,
    /// Did not exit before the deadline
    Timeout,
    /// Exited with a non-zero status (None when killed by a signal)
    NonZeroExit(Option<i32>),
    /// Ran fine but the banner did not identify the expected family
    Unrecognized,
    /// Any other spawn or wait error
    Io(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::NotFound => write!(f, "not found"),
            ProbeFailure::Timeout => write!(f, "timed out"),
            ProbeFailure::NonZeroExit(Some(code)) => write!(f, "exited with status {}", code),
            ProbeFailure::NonZeroExit(None) => write!(f, "terminated by signal"),
            ProbeFailure::Unrecognized => write!(f, "unrecognized version banner"),
            ProbeFailure::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeFailure {}

impl From<std::io::Error> for ProbeFailure {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProbeFailure::NotFound
        } else {
            ProbeFailure::Io(e.to_string())
        }
    }
}

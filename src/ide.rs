//! VSCode configuration writer
//!
//! Writes two files under `<root>/.vscode/`:
//!
//! - `c_cpp_properties.json` is always replaced wholesale.
//! - `settings.json` is read, merged and written back. Only
//!   `C_Cpp.default.compilerPath` is touched; every other key passes through.
//!
//! The existing settings are parsed before anything is written, so a
//! malformed `settings.json` aborts the run with both files untouched.

use crate::config::{COMPILER_PATH_KEY, CppConfiguration, CppProperties, default_settings};
use crate::toolchain::{CompilerCandidate, HostOs};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const VSCODE_DIR: &str = ".vscode";
pub const CPP_PROPERTIES_FILE: &str = "c_cpp_properties.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Error type for reading and writing editor configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Existing file could not be read
    Read(PathBuf, std::io::Error),
    /// Existing file is not valid JSON
    Parse(PathBuf, serde_json::Error),
    /// Existing file is JSON but its top level is not an object
    NotAnObject(PathBuf),
    /// Directory creation or file write failed
    Write(PathBuf, std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(path, e) => write!(f, "failed to read {}: {}", path.display(), e),
            ConfigError::Parse(path, e) => write!(f, "invalid JSON in {}: {}", path.display(), e),
            ConfigError::NotAnObject(path) => {
                write!(f, "{} must contain a JSON object", path.display())
            }
            ConfigError::Write(path, e) => write!(f, "failed to write {}: {}", path.display(), e),
            ConfigError::Serialize(e) => write!(f, "failed to serialize configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(_, e) | ConfigError::Write(_, e) => Some(e),
            ConfigError::Parse(_, e) | ConfigError::Serialize(e) => Some(e),
            ConfigError::NotAnObject(_) => None,
        }
    }
}

/// Locations of the two managed files for a project root
#[derive(Debug, Clone)]
pub struct VscodePaths {
    pub dir: PathBuf,
    pub cpp_properties: PathBuf,
    pub settings: PathBuf,
}

impl VscodePaths {
    pub fn new(root: &Path) -> Self {
        let dir = root.join(VSCODE_DIR);
        Self {
            cpp_properties: dir.join(CPP_PROPERTIES_FILE),
            settings: dir.join(SETTINGS_FILE),
            dir,
        }
    }
}

/// Both documents, ready to serialize
#[derive(Debug, Clone)]
pub struct VscodeConfig {
    pub cpp_properties: CppProperties,
    pub settings: Map<String, Value>,
}

/// IntelliSense descriptor for the selected compiler on this host
pub fn build_cpp_properties(selection: &CompilerCandidate, os: HostOs) -> CppProperties {
    CppProperties::single(CppConfiguration::new(
        os.config_name(),
        &selection.path,
        &selection.mode,
    ))
}

/// Existing settings, or the default document if the file does not exist.
pub fn load_settings(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    if !path.exists() {
        return Ok(default_settings());
    }

    let contents =
        fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
    }
}

/// Point the settings at the selected compiler, leaving all other keys alone.
pub fn merge_compiler_path(settings: &mut Map<String, Value>, compiler_path: &str) {
    settings.insert(
        COMPILER_PATH_KEY.to_string(),
        Value::String(compiler_path.to_string()),
    );
}

/// Build both documents without touching the filesystem beyond reading settings.
pub fn prepare_config(
    paths: &VscodePaths,
    selection: &CompilerCandidate,
    os: HostOs,
) -> Result<VscodeConfig, ConfigError> {
    let cpp_properties = build_cpp_properties(selection, os);
    let mut settings = load_settings(&paths.settings)?;
    merge_compiler_path(&mut settings, &selection.path);
    Ok(VscodeConfig {
        cpp_properties,
        settings,
    })
}

/// JSON with 4-space indentation
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(ConfigError::Serialize)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let formatted = to_json_pretty(value)?;
    fs::write(path, formatted).map_err(|e| ConfigError::Write(path.to_path_buf(), e))
}

/// Persist both documents, creating `.vscode/` (and any missing ancestors) first.
///
/// Not transactional: a failure writing `settings.json` leaves the new
/// `c_cpp_properties.json` in place.
pub fn write_config(paths: &VscodePaths, config: &VscodeConfig) -> Result<(), ConfigError> {
    fs::create_dir_all(&paths.dir).map_err(|e| ConfigError::Write(paths.dir.clone(), e))?;
    write_json(&paths.cpp_properties, &config.cpp_properties)?;
    write_json(&paths.settings, &config.settings)?;
    Ok(())
}

/// Read-merge-write both files for the selected compiler.
pub fn update_vscode_config(
    root: &Path,
    selection: &CompilerCandidate,
    os: HostOs,
) -> Result<VscodeConfig, ConfigError> {
    let paths = VscodePaths::new(root);
    let config = prepare_config(&paths, selection, os)?;
    write_config(&paths, &config)?;
    Ok(config)
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// Format version of `c_cpp_properties.json`
pub const CPP_PROPERTIES_VERSION: u32 = 4;

/// The one settings key this tool owns
pub const COMPILER_PATH_KEY: &str = "C_Cpp.default.compilerPath";

/// Include paths written for every configuration
pub const INCLUDE_PATHS: &[&str] = &[
    "${workspaceFolder}/**",
    "${workspaceFolder}/include",
    "${workspaceFolder}/src",
    "${command:cmake.getLaunchTargetDirectory}",
];

/// Options for one detect-and-write run
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// Project root; `.vscode/` is created beneath it
    pub root: PathBuf,
    pub verbose: bool,
    /// Print the generated documents instead of writing them
    pub dry_run: bool,
}

/// `c_cpp_properties.json`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CppProperties {
    pub configurations: Vec<CppConfiguration>,
    pub version: u32,
}

/// One entry of `configurations` in `c_cpp_properties.json`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CppConfiguration {
    pub name: String,
    pub include_path: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    pub intelli_sense_mode: String,
    pub compiler_path: String,
    #[serde(default = "default_c_standard")]
    pub c_standard: String,
    #[serde(default = "default_cpp_standard")]
    pub cpp_standard: String,
}

impl CppConfiguration {
    pub fn new(name: &str, compiler_path: &str, intelli_sense_mode: &str) -> Self {
        Self {
            name: name.to_string(),
            include_path: INCLUDE_PATHS.iter().map(|s| s.to_string()).collect(),
            defines: Vec::new(),
            intelli_sense_mode: intelli_sense_mode.to_string(),
            compiler_path: compiler_path.to_string(),
            c_standard: default_c_standard(),
            cpp_standard: default_cpp_standard(),
        }
    }
}

impl CppProperties {
    /// A document holding exactly one configuration
    pub fn single(configuration: CppConfiguration) -> Self {
        Self {
            configurations: vec![configuration],
            version: CPP_PROPERTIES_VERSION,
        }
    }
}

fn default_c_standard() -> String {
    "c17".to_string()
}

fn default_cpp_standard() -> String {
    "c++20".to_string()
}

/// Baseline `settings.json` used when the project has none.
pub fn default_settings() -> Map<String, Value> {
    let value = json!({
        "files.associations": {},
        "C_Cpp.intelliSenseEngine": "default",
        "C_Cpp.default.cppStandard": "c++20",
        "C_Cpp.errorSquiggles": "enabled",
        "C_Cpp.dimInactiveRegions": false,
        "C_Cpp.intelliSense.maxMemory": 4096,
        "C_Cpp.exclusionPolicy": "checkFolders",
        "C_Cpp.default.compilerArgs": [
            "/std:c++20",
            "/await",
            "/permissive-"
        ],
        "cmake.buildDirectory": "${workspaceFolder}/build"
    });

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

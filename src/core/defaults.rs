use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::checker::{Compliance, SbomSpec};
use crate::io::read_file;
use crate::paths;
use crate::report::OutputFormat;

/// Defaults that can be overridden via sbomcheck.json. CLI flags win over both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    #[serde(default)]
    pub sbom_spec: SbomSpec,

    #[serde(default)]
    pub comply: Compliance,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub skip_validation: bool,

    /// `major.minor` SPDX versions accepted by the CLI.
    #[serde(default = "default_supported_versions")]
    pub supported_versions: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            sbom_spec: SbomSpec::default(),
            comply: Compliance::default(),
            output: OutputFormat::default(),
            skip_validation: false,
            supported_versions: default_supported_versions(),
        }
    }
}

impl Defaults {
    pub fn is_supported_version(&self, (major, minor): (u32, u32)) -> bool {
        let label = format!("{}.{}", major, minor);
        self.supported_versions.iter().any(|v| v.trim() == label)
    }
}

fn default_supported_versions() -> Vec<String> {
    vec!["2.2".to_string(), "2.3".to_string(), "3.0".to_string()]
}

/// Load defaults, merging file config with built-in defaults.
/// If sbomcheck.json is missing or invalid, returns built-in defaults.
pub fn load_defaults() -> Defaults {
    match paths::sbomcheck_json().and_then(|path| load_defaults_from(&path)) {
        Ok(defaults) => defaults,
        Err(err) => {
            debug!("Using built-in defaults: {}", err);
            builtin_defaults()
        }
    }
}

/// Load defaults from a specific config file.
pub fn load_defaults_from(path: &Path) -> crate::Result<Defaults> {
    let content = read_file(path, "read config")?;

    let defaults: Defaults = serde_json::from_str(&content).map_err(|e| {
        crate::Error::validation_invalid_json(e, Some(format!("parse {}", path.display())))
    })?;

    Ok(defaults)
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SBOMCHECK_CONFIG";

const CONFIG_FILE: &str = "sbomcheck.json";

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// `$XDG_CONFIG_HOME/sbomcheck` when set, else `~/.config/sbomcheck`.
#[cfg_attr(windows, allow(dead_code))]
fn unix_config_dir(xdg_config_home: Option<String>, home: Option<String>) -> Option<PathBuf> {
    match (xdg_config_home, home) {
        (Some(xdg), _) => Some(PathBuf::from(xdg).join("sbomcheck")),
        (None, Some(home)) => Some(PathBuf::from(home).join(".config").join("sbomcheck")),
        (None, None) => None,
    }
}

/// Directory holding `sbomcheck.json` (`%APPDATA%\sbomcheck` on Windows).
pub fn sbomcheck() -> Result<PathBuf> {
    #[cfg(windows)]
    let dir = non_empty("APPDATA").map(|appdata| PathBuf::from(appdata).join("sbomcheck"));

    #[cfg(not(windows))]
    let dir = unix_config_dir(non_empty("XDG_CONFIG_HOME"), non_empty("HOME"));

    dir.ok_or_else(|| {
        Error::internal_unexpected("cannot locate the config directory: no home directory set")
            .with_hint(format!("Set {} to the config file path", CONFIG_ENV))
    })
}

/// Config file path: `$SBOMCHECK_CONFIG` (with `~` expanded) or
/// `sbomcheck.json` in the config directory.
pub fn sbomcheck_json() -> Result<PathBuf> {
    match non_empty(CONFIG_ENV) {
        Some(custom) => Ok(expand(&custom)),
        None => Ok(sbomcheck()?.join(CONFIG_FILE)),
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};

/// Points at a config file explicitly, taking precedence over every other location.
pub const CONFIG_PATH_ENV: &str = "GYANFORGE_CONFIG";

const LOCAL_CONFIG: &str = "./config.toml";

fn user_config_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    let base = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"));
    #[cfg(windows)]
    let base = std::env::var_os("APPDATA").map(PathBuf::from);
    #[cfg(not(any(unix, windows)))]
    let base: Option<PathBuf> = None;

    base.map(|dir| dir.join(crate::APPLICATION_NAME))
}

/// Locations to try, most specific first.
fn candidates(explicit: Option<PathBuf>, user_dir: Option<PathBuf>, use_local: bool) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = explicit.into_iter().collect();
    if !use_local {
        paths.extend(user_dir.map(|dir| dir.join("config.toml")));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

fn first_existing(paths: &[PathBuf]) -> ConfigResult<&Path> {
    paths
        .iter()
        .find(|p| p.is_file())
        .map(PathBuf::as_path)
        .ok_or_else(|| ConfigError::NotFound(paths.last().cloned().unwrap_or_default()))
}

/// Resolves the config file for this process.
///
/// `$GYANFORGE_CONFIG` wins when set. Debug builds (`use_local`) then use
/// `./config.toml`; release builds look in the user config directory first.
pub fn find_config_file(use_local: bool) -> ConfigResult<PathBuf> {
    let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let paths = candidates(explicit, user_config_dir(), use_local);
    first_existing(&paths).map(Path::to_path_buf)
}

pub fn read_config(use_local: bool) -> ConfigResult<Vec<u8>> {
    let path = find_config_file(use_local)?;
    tracing::debug!("using {} as configuration file", path.display());
    Ok(std::fs::read(path)?)
}

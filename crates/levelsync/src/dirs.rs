//! Per-user directories.

use std::env;
use std::path::PathBuf;

const APP: &str = "levelsync";

/// - Windows: `APPDATA`
/// - macOS: `~/Library/Application Support`
/// - Linux: `$XDG_CONFIG_HOME` or `~/.config`
pub fn user_config() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        env::var_os("APPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home::home_dir().map(|p| p.join("Library/Application Support"))
    } else {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|p| p.join(".config")))
    }
}

/// - Windows: `LOCALAPPDATA`
/// - macOS: `~/Library/Application Support`
/// - Linux: `$XDG_DATA_HOME` or `~/.local/share`
pub fn user_data() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        env::var_os("LOCALAPPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home::home_dir().map(|p| p.join("Library/Application Support"))
    } else {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|p| p.join(".local/share")))
    }
}

pub fn config_file() -> Option<PathBuf> { user_config().map(|p| p.join(APP).join("config.toml")) }

pub fn default_level_dir() -> Option<PathBuf> { user_data().map(|p| p.join(APP).join("levels")) }

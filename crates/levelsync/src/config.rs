use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use levelsync_fetch::{ClientOptions, DEFAULT_ENDPOINT, DEFAULT_LOOKUP_URL, Lookup};
use serde::{Deserialize, Serialize};

use crate::dirs;

pub const ENV_PREFIX: &str = "LEVELSYNC_";

/// Layered: defaults, then the TOML file, then `LEVELSYNC_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Searched in order; new downloads go to the first writable one.
    pub directories:          Vec<PathBuf>,
    pub lookup_url:           String,
    pub lookup_endpoint:      String,
    /// Run as the authoritative host.
    pub server:               bool,
    pub timeout_secs:         u64,
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directories:          dirs::default_level_dir().into_iter().collect(),
            lookup_url:           DEFAULT_LOOKUP_URL.to_string(),
            lookup_endpoint:      DEFAULT_ENDPOINT.to_string(),
            server:               false,
            timeout_secs:         300,
            connect_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from `path`, or the per-user config file when `None`. A missing
    /// file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let file = path.map(Path::to_path_buf).or_else(dirs::config_file);
        Self::figment(file.as_deref()).extract()
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut fig = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            fig = fig.merge(Toml::file(file));
        }
        fig.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
    }

    pub fn lookup(&self) -> Lookup { Lookup::new(&self.lookup_url, &self.lookup_endpoint) }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..ClientOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                directories = ["/a", "/b"]
                timeout_secs = 10
                lookup_url = "https://mirror.example/api/"
                "#,
            )?;
            jail.set_env("LEVELSYNC_TIMEOUT_SECS", "20");
            jail.set_env("LEVELSYNC_SERVER", "true");

            let config = Config::load(Some(Path::new("config.toml")))?;
            assert_eq!(config.directories, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
            assert_eq!(config.timeout_secs, 20);
            assert!(config.server);
            assert_eq!(config.lookup().service_name(), "MIRROR.EXAMPLE");
            assert_eq!(config.lookup_endpoint, DEFAULT_ENDPOINT);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load(Some(Path::new("absent.toml")))?;
            assert_eq!(config.connect_timeout_secs, 30);
            assert_eq!(config.lookup_url, DEFAULT_LOOKUP_URL);
            Ok(())
        });
    }
}

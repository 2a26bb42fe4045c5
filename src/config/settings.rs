use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dns::VERCEL_API_BASE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where and how the DNS provider API is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// TTL used for new records and for existing records that carry none.
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Upper bound on record-list pages fetched per hostname.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_base() -> String {
    VERCEL_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_ttl() -> u32 {
    60
}

fn default_page_limit() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    20
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            log_level: default_log_level(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_seconds: default_timeout(),
            default_ttl: default_ttl(),
            page_limit: default_page_limit(),
            max_pages: default_max_pages(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `path`
    /// is `None`. An explicit path must exist; a missing default file yields
    /// the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::load_from(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(unix)]
        {
            PathBuf::from("/etc/vercel-ddns")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\ProgramData\vercel-ddns")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:9000"
log_level = "debug"

[upstream]
api_base = "http://localhost:1234"
timeout_seconds = 5
default_ttl = 300
page_limit = 50
max_pages = 3
"#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.server.listen, "127.0.0.1:9000");
        assert_eq!(settings.server.log_level, "debug");
        assert_eq!(settings.upstream.api_base, "http://localhost:1234");
        assert_eq!(settings.upstream.timeout(), Duration::from_secs(5));
        assert_eq!(settings.upstream.default_ttl, 300);
        assert_eq!(settings.upstream.page_limit, 50);
        assert_eq!(settings.upstream.max_pages, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let settings: Settings = toml::from_str("[upstream]\ntimeout_seconds = 3\n").unwrap();
        assert_eq!(settings.server.listen, "0.0.0.0:8080");
        assert_eq!(settings.server.log_level, "info");
        assert_eq!(settings.upstream.api_base, "https://api.vercel.com");
        assert_eq!(settings.upstream.timeout_seconds, 3);
        assert_eq!(settings.upstream.default_ttl, 60);
        assert_eq!(settings.upstream.page_limit, 100);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nlisten = \"127.0.0.1:8081\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.server.listen, "127.0.0.1:8081");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nlisten = ").unwrap();
        assert!(Settings::load_from(file.path()).is_err());
    }
}

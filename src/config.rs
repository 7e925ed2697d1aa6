use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::client::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};

pub const API_KEY_ENV: &str = "SNUSBASE_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
}

#[derive(Default, Deserialize)]
pub struct ApiSection {
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ApiSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSection")
            .field("key", &self.key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DefaultsSection {
    pub group_by: Option<String>,
    pub format: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        for path in config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Command-line values win over the config file, which wins over built-in defaults.
    pub fn client_options(&self, base_url: Option<&str>, timeout_secs: Option<u64>) -> ClientOptions {
        let base_url = base_url
            .map(String::from)
            .or_else(|| self.api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = timeout_secs
            .or(self.api.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        ClientOptions {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            ..ClientOptions::default()
        }
    }

    pub fn default_group_by(&self) -> &str {
        self.defaults.group_by.as_deref().unwrap_or("db")
    }
}

fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".snusbase.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("snusbase").join("config.toml"));
    }

    paths
}

/// Snusbase API key. Never printed, `Debug` included.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        Ok(Self(key))
    }

    /// Looks for a key in `explicit`, then `SNUSBASE_API_KEY`, then the config file.
    pub fn resolve(explicit: Option<&str>, config: &Config) -> Result<Self> {
        first_present([
            explicit.map(String::from),
            std::env::var(API_KEY_ENV).ok(),
            config.api.key.clone(),
        ])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn first_present<I>(candidates: I) -> Result<ApiKey>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find_map(|key| ApiKey::new(key).ok())
        .ok_or(Error::MissingApiKey)
}

/// Parses `KEY=value` lines. Blank lines, `#` comments and lines without `=`
/// are skipped; the split happens at the first `=`.
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Loads a `.env` file into the process environment without overriding
/// variables that are already set. Returns how many variables were set.
/// A missing file is not an error.
pub fn load_env_file(path: &Path) -> Result<usize> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut applied = 0;
    for (key, value) in parse_env_file(&content) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            applied += 1;
        }
    }

    Ok(applied)
}

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result, anyhow};

const APP_DIR: &str = "movie-recommender";
const ENV_PREFIX: &str = "RECOMMENDER_";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the recommendation API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds; 0 waits forever
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where the TUI writes its log
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Environment overrides, read with the `RECOMMENDER_` prefix
#[derive(Deserialize, Debug, Default)]
struct EnvOverrides {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults, then the config file, then `.env` and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::get_config_path() {
            Ok(path) => Self::load_from(&path)?,
            Err(_) => Self::default(),
        };

        dotenvy::dotenv().ok();
        config.apply_env(std::env::vars())?;
        Ok(config)
    }

    /// Read a JSON config file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Apply `RECOMMENDER_*` variables from the given key/value pairs.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: EnvOverrides = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|e| anyhow!("Failed to load config from environment: {}", e))?;

        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(path) = overrides.log_file {
            self.log_file = Some(path);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Configured log file, or one under the user's cache directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("recommender.log")))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join(APP_DIR).join("config.json"))
    }
}

/// Open the log file for appending, creating its directory if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_base_url":"http://recs.internal:9000"}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api_base_url, "http://recs.internal:9000");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(vars(&[
                ("RECOMMENDER_API_BASE_URL", "http://api.example:8000"),
                ("RECOMMENDER_REQUEST_TIMEOUT_SECS", "0"),
                ("RECOMMENDER_LOG_FILE", "/tmp/recs.log"),
                ("API_BASE_URL", "http://ignored"),
            ]))
            .unwrap();

        assert_eq!(config.api_base_url, "http://api.example:8000");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/recs.log")));
    }

    #[test]
    fn test_open_log_file_creates_directory_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("recommender.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_reports_the_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot be a parent directory
        let path = file.path().join("recommender.log");

        let err = open_log_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("log directory"), "{:#}", err);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_env(vars(&[("RECOMMENDER_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Upper bound for every timeout setting; larger values are clamped.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Server that hosts the `genomes/all/GCF/...` tree referenced by Kraken 2 manifests.
pub const DEFAULT_BASE_URL: &str = "https://ftp.ncbi.nlm.nih.gov/";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per file (including the first).
    pub max_attempts: u32,
    /// Backoff factor in seconds: retries wait 0, factor, 2*factor, 4*factor, ...
    pub backoff_factor_secs: f64,
    /// HTTP status codes that are treated as transient and retried.
    pub status_forcelist: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor_secs: 1.0,
            status_forcelist: vec![500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Negative or NaN factors mean no delay; infinite or huge ones are capped at `max_delay`.
    pub fn to_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        let backoff_factor = Duration::try_from_secs_f64(self.backoff_factor_secs.max(0.0))
            .unwrap_or(defaults.max_delay)
            .min(defaults.max_delay);
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            backoff_factor,
            status_forcelist: self.status_forcelist.clone(),
            ..defaults
        }
    }
}

/// Global configuration loaded from `~/.config/k2dl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct K2dlConfig {
    /// Base URL that manifest paths are joined onto.
    pub base_url: String,
    /// Default number of worker threads when `--threads` is not given.
    pub threads: usize,
    /// Seconds a GET attempt may go without receiving data before it is aborted.
    pub request_timeout_secs: u64,
    /// Connect timeout for a single GET attempt.
    pub connect_timeout_secs: u64,
    /// How long the collector waits on a running task before recording a timeout.
    pub collect_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for K2dlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            threads: 4,
            request_timeout_secs: 10,
            connect_timeout_secs: 10,
            collect_timeout_secs: 30,
            retry: None,
        }
    }
}

impl K2dlConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// How long a transfer may go without receiving data.
    pub fn request_timeout(&self) -> Duration {
        bounded_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        bounded_secs(self.connect_timeout_secs)
    }

    pub fn collect_timeout(&self) -> Duration {
        bounded_secs(self.collect_timeout_secs)
    }
}

fn bounded_secs(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(1, MAX_TIMEOUT_SECS))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("k2dl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<K2dlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = K2dlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<K2dlConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: K2dlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = K2dlConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.threads, 4);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.collect_timeout(), Duration::from_secs(30));
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn default_retry_policy_matches_ncbi_settings() {
        let p = K2dlConfig::default().retry_policy();
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.backoff_factor, Duration::from_secs(1));
        assert_eq!(p.status_forcelist, vec![500, 502, 503, 504]);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = K2dlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: K2dlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.base_url, cfg.base_url);
        assert_eq!(parsed.threads, cfg.threads);
        assert_eq!(parsed.collect_timeout_secs, cfg.collect_timeout_secs);
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            base_url = "http://mirror.example.org/ncbi/"
            threads = 8
            request_timeout_secs = 20
            connect_timeout_secs = 5
            collect_timeout_secs = 60

            [retry]
            max_attempts = 5
            backoff_factor_secs = 0.5
            status_forcelist = [429, 503]
        "#;
        let cfg: K2dlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.threads, 8);
        let p = cfg.retry_policy();
        assert_eq!(p.max_attempts, 5);
        assert_eq!(p.backoff_factor, Duration::from_millis(500));
        assert_eq!(p.status_forcelist, vec![429, 503]);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let retry = RetryConfig {
            backoff_factor_secs: f64::INFINITY,
            ..RetryConfig::default()
        };
        assert_eq!(retry.to_policy().backoff_factor, RetryPolicy::default().max_delay);
        let retry = RetryConfig {
            backoff_factor_secs: -2.0,
            ..RetryConfig::default()
        };
        assert_eq!(retry.to_policy().backoff_factor, Duration::ZERO);

        let cfg = K2dlConfig {
            request_timeout_secs: 0,
            collect_timeout_secs: u64::MAX,
            ..K2dlConfig::default()
        };
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.collect_timeout(), Duration::from_secs(MAX_TIMEOUT_SECS));
    }

    #[test]
    fn infinite_backoff_in_toml_loads() {
        let cfg: K2dlConfig = toml::from_str(
            "base_url = \"http://h/\"\nthreads = 1\nrequest_timeout_secs = 1\nconnect_timeout_secs = 1\ncollect_timeout_secs = 1\n[retry]\nmax_attempts = 3\nbackoff_factor_secs = inf\nstatus_forcelist = [503]\n",
        )
        .unwrap();
        assert_eq!(cfg.retry_policy().backoff_factor, RetryPolicy::default().max_delay);
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let retry = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(retry.to_policy().max_attempts, 1);
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "base_url = \"http://127.0.0.1:1/\"\nthreads = 2\nrequest_timeout_secs = 1\nconnect_timeout_secs = 1\ncollect_timeout_secs = 2\n",
        )
        .unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.threads, 2);
        assert_eq!(cfg.base_url, "http://127.0.0.1:1/");
    }

    #[test]
    fn load_from_path_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threads = \"many\"").unwrap();
        assert!(load_from_path(&path).is_err());
    }
}

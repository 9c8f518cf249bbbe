//! Runtime settings for one grabber run.
//!
//! The launcher name, log file names and poll interval are fixed; only
//! ambient knobs come from the environment:
//!
//! - `GRABBER_SCAN`: `incremental` (default) or `replay`
//! - `GRABBER_FORMAT`: `text` (default) or `json`
//! - `GRABBER_WORKDIR`: directory the job runs in, default `.`

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::consts::{JOB_LOG, LAUNCHER, POLL_INTERVAL, RUN_LOG};
use crate::error::{GrabberError, Result};
use crate::logs::energy::ScanMode;
use crate::output::OutputFormat;

pub const ENV_SCAN: &str = "GRABBER_SCAN";
pub const ENV_FORMAT: &str = "GRABBER_FORMAT";
pub const ENV_WORKDIR: &str = "GRABBER_WORKDIR";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Program every command line is prefixed with.
    pub launcher: String,
    /// Working directory of the job; relative log paths resolve against it.
    pub work_dir: PathBuf,
    pub run_log: PathBuf,
    pub job_log: PathBuf,
    pub interval: Duration,
    pub scan: ScanMode,
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            launcher: LAUNCHER.to_string(),
            work_dir: PathBuf::from("."),
            run_log: PathBuf::from(RUN_LOG),
            job_log: PathBuf::from(JOB_LOG),
            interval: POLL_INTERVAL,
            scan: ScanMode::default(),
            format: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or blank keys
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(value) = get(ENV_SCAN) {
            settings.scan = value.parse().map_err(|_| GrabberError::Config {
                key: ENV_SCAN,
                value,
            })?;
        }
        if let Some(value) = get(ENV_FORMAT) {
            settings.format = value.parse().map_err(|_| GrabberError::Config {
                key: ENV_FORMAT,
                value,
            })?;
        }
        if let Some(value) = get(ENV_WORKDIR) {
            settings.work_dir = PathBuf::from(value);
        }

        Ok(settings)
    }

    pub fn run_log_path(&self) -> PathBuf {
        resolve(&self.work_dir, &self.run_log)
    }

    pub fn job_log_path(&self) -> PathBuf {
        resolve(&self.work_dir, &self.job_log)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_fixed_names() {
        let settings = Settings::default();
        assert_eq!(settings.launcher, "longbow");
        assert_eq!(settings.run_log, PathBuf::from("log"));
        assert_eq!(settings.job_log, PathBuf::from("jobname.log"));
        assert_eq!(settings.interval, Duration::from_secs(5));
        assert_eq!(settings.scan, ScanMode::Incremental);
        assert_eq!(settings.format, OutputFormat::Text);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.scan, ScanMode::Incremental);
        assert_eq!(settings.work_dir, PathBuf::from("."));
    }

    #[test]
    fn environment_overrides_ambient_knobs() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_SCAN, "replay"),
            (ENV_FORMAT, "JSON"),
            (ENV_WORKDIR, "/scratch/run1"),
        ]))
        .unwrap();
        assert_eq!(settings.scan, ScanMode::Replay);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.job_log_path(), PathBuf::from("/scratch/run1/jobname.log"));
        assert_eq!(settings.run_log_path(), PathBuf::from("/scratch/run1/log"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = Settings::from_lookup(lookup(&[(ENV_SCAN, "  ")])).unwrap();
        assert_eq!(settings.scan, ScanMode::Incremental);
    }

    #[test]
    fn invalid_value_is_a_config_error() {
        let err = Settings::from_lookup(lookup(&[(ENV_FORMAT, "yaml")])).unwrap_err();
        assert!(matches!(
            err,
            GrabberError::Config { key: ENV_FORMAT, ref value } if value == "yaml"
        ));
    }

    #[test]
    fn absolute_log_paths_ignore_work_dir() {
        let settings = Settings {
            work_dir: PathBuf::from("/elsewhere"),
            run_log: PathBuf::from("/abs/log"),
            ..Settings::default()
        };
        assert_eq!(settings.run_log_path(), PathBuf::from("/abs/log"));
        assert_eq!(settings.job_log_path(), PathBuf::from("/elsewhere/jobname.log"));
    }
}

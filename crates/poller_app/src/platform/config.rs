use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use poller_core::{PollTiming, Row, BACKOFF_WINDOW_MINUTES, POLL_INTERVAL};
use poller_engine::FetchSettings;
use poller_logging::poller_info;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One table row as listed in the config file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RowConfig {
    pub(crate) url: String,
    pub(crate) date: String,
    #[serde(default)]
    pub(crate) content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PollerConfig {
    #[serde(default = "default_base_url")]
    pub(crate) base_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub(crate) poll_interval_ms: u64,
    #[serde(default = "default_backoff_minutes")]
    pub(crate) backoff_minutes: i64,
    #[serde(default = "default_connect_timeout_ms")]
    pub(crate) connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub(crate) request_timeout_ms: u64,
    #[serde(default = "default_max_bytes")]
    pub(crate) max_bytes: u64,
    #[serde(default)]
    pub(crate) rows: Vec<RowConfig>,
}

fn default_base_url() -> String {
    FetchSettings::default().base_url
}

fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL.as_millis() as u64
}

fn default_backoff_minutes() -> i64 {
    BACKOFF_WINDOW_MINUTES
}

fn default_connect_timeout_ms() -> u64 {
    FetchSettings::default().connect_timeout.as_millis() as u64
}

fn default_request_timeout_ms() -> u64 {
    FetchSettings::default().request_timeout.as_millis() as u64
}

fn default_max_bytes() -> u64 {
    FetchSettings::default().max_bytes
}

impl PollerConfig {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        poller_info!("Loaded {} rows from {:?}", config.rows.len(), path);
        Ok(config)
    }

    pub(crate) fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid("connect_timeout_ms must be positive".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be positive".into()));
        }
        if !(0..=24 * 60).contains(&self.backoff_minutes) {
            return Err(ConfigError::Invalid(format!(
                "backoff_minutes must be within 0..=1440, got {}",
                self.backoff_minutes
            )));
        }
        if self.rows.is_empty() {
            return Err(ConfigError::Invalid("no rows to poll".into()));
        }
        Ok(())
    }

    pub(crate) fn timing(&self) -> PollTiming {
        PollTiming {
            interval: Duration::from_millis(self.poll_interval_ms),
            backoff: TimeDelta::minutes(self.backoff_minutes),
        }
    }

    pub(crate) fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }

    pub(crate) fn rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| {
                Row::new(row.url.clone(), row.date.clone()).with_content(row.content.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const FULL: &str = r#"(
        base_url: "http://broker.example.org/api",
        poll_interval_ms: 250,
        backoff_minutes: 2,
        connect_timeout_ms: 1000,
        request_timeout_ms: 2000,
        max_bytes: 4096,
        rows: [
            (url: "/submission/42", date: "2024-01-01T00:05:00Z"),
            (url: "/submission/43", date: "Mon, 01 Jan 2024 00:05:00 GMT", content: "<td>Draft</td>"),
        ],
    )"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = PollerConfig::parse(
            r#"(rows: [(url: "/submission/42", date: "2024-01-01T00:05:00Z")])"#,
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.timing(), PollTiming::default());
        let settings = config.fetch_settings();
        let defaults = FetchSettings::default();
        assert_eq!(settings.base_url, defaults.base_url);
        assert_eq!(settings.request_timeout, defaults.request_timeout);
        assert_eq!(
            config.rows(),
            vec![Row::new("/submission/42", "2024-01-01T00:05:00Z")]
        );
    }

    #[test]
    fn full_config_overrides_everything() {
        let config = PollerConfig::parse(FULL).unwrap();
        config.validate().unwrap();

        assert_eq!(
            config.timing(),
            PollTiming {
                interval: Duration::from_millis(250),
                backoff: TimeDelta::minutes(2),
            }
        );
        let settings = config.fetch_settings();
        assert_eq!(settings.base_url, "http://broker.example.org/api");
        assert_eq!(settings.connect_timeout, Duration::from_millis(1000));
        assert_eq!(settings.request_timeout, Duration::from_millis(2000));
        assert_eq!(settings.max_bytes, 4096);
        assert_eq!(config.rows()[1].content, "<td>Draft</td>");
    }

    #[test]
    fn load_reads_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rows.ron");
        fs::write(&path, FULL).unwrap();

        let config = PollerConfig::load(&path).unwrap();
        assert_eq!(config.rows.len(), 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let err = PollerConfig::load(&temp.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rows.ron");
        fs::write(&path, "(rows: [(url: 42)])").unwrap();

        let err = PollerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn validation_rejects_unusable_settings() {
        let base = PollerConfig::parse(FULL).unwrap();

        let mut config = base.clone();
        config.rows.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.poll_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.connect_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.request_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.backoff_minutes = -1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base;
        config.base_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

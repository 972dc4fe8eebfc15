//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc};

use anyhow::Context;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::service::questions::stackexchange::STACK_EXCHANGE_API_URL;

use super::{
    interval::PollInterval,
    log_level::LogLevel,
    types::Res,
};

/// Prefix shared by every environment variable (`SS_STACK_SITE`, ...).
pub const ENV_PREFIX: &str = "SS";

/// Config file used when no explicit path is given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = ".hidden/config.toml";

/// Placeholder logged in place of secrets.
const REDACTED: &str = "<redacted>";

/// Default lookback window, in days.
fn default_slack_history() -> u32 {
    30
}

/// Legacy name for `slack_history`, honored only when `slack_history` is unset.
const LEGACY_HISTORY_KEY: &str = "stack_history";

/// Default Stack Exchange API root.
fn default_stack_api_url() -> String {
    STACK_EXCHANGE_API_URL.to_string()
}

/// Default log level name.
fn default_log_level() -> String {
    "INFO".to_string()
}

/// Configuration for the overflow-news application.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Resolved configuration values.
#[serde_as]
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ConfigInner {
    /// Stack Exchange site to poll, e.g. `stackoverflow` (`SS_STACK_SITE`).
    pub stack_site: String,
    /// Tag filter, semicolon separated (`SS_STACK_TAGS`).
    pub stack_tags: String,
    /// Stack Exchange API root (`SS_STACK_API_URL`).
    #[serde(default = "default_stack_api_url")]
    pub stack_api_url: String,
    /// Interval between two poll cycles (`SS_STACK_POLL`).
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub stack_poll: PollInterval,
    /// Slack API token (`SS_SLACK_TOKEN`).
    pub slack_token: String,
    /// Display name messages are posted under (`SS_SLACK_USERNAME`).
    pub slack_username: String,
    /// Destination channel (`SS_SLACK_CHANNEL`).
    pub slack_channel: String,
    /// Lookback window on startup, in days (`SS_SLACK_HISTORY`).
    #[serde(default = "default_slack_history")]
    pub slack_history: u32,
    /// Log Slack request and response bodies (`SS_SLACK_DEBUG`).
    #[serde(default)]
    pub slack_debug: bool,
    /// Minimum log level name (`SS_LOG_LEVEL`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ConfigInner {
    /// A copy that is safe to log.
    pub fn redacted(&self) -> Self {
        Self {
            slack_token: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

impl Config {
    /// Load from the process environment, layered over an optional config file.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        Self::from_sources(explicit_path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from the given environment source, layered over an optional config file.
    ///
    /// The environment always wins over the file.
    pub fn from_sources(explicit_path: Option<&Path>, env: config::Environment) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            cfg = cfg.add_source(config::File::with_name(DEFAULT_CONFIG_PATH));
        }

        cfg = cfg.add_source(env);

        let built = cfg.build()?;
        let mut inner: ConfigInner = built.clone().try_deserialize()?;

        // `SS_SLACK_HISTORY` wins over the legacy `SS_STACK_HISTORY` when both are set.
        if matches!(built.get::<u32>("slack_history"), Err(config::ConfigError::NotFound(_))) {
            match built.get::<u32>(LEGACY_HISTORY_KEY) {
                Ok(days) => inner.slack_history = days,
                Err(config::ConfigError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let result = Config { inner: Arc::new(inner) };

        result.watermark_origin(Utc::now())?;

        Ok(result)
    }

    /// Parse the configured log level.
    pub fn log_level(&self) -> Res<LogLevel> {
        self.log_level.parse()
    }

    /// The instant `slack_history` days before `now`.
    pub fn watermark_origin(&self, now: DateTime<Utc>) -> Res<DateTime<Utc>> {
        TimeDelta::try_days(i64::from(self.slack_history))
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .with_context(|| format!("Lookback window of {} days is out of range.", self.slack_history))
    }
}

// Tests.

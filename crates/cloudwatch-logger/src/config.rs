// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::client::LogStreamClient;
use crate::constants::{DEFAULT_DEBOUNCE_TIME, ENV_DEBOUNCE_TIME_MS, ENV_LOG_GROUP_NAME};
use crate::errors::ConfigError;

/// Options recognised when building a logger. `client` and
/// `log_group_name` are required, everything else has a default.
#[derive(Clone, Default)]
pub struct LoggerOptions {
    pub client: Option<Arc<dyn LogStreamClient>>,
    pub log_group_name: Option<String>,
    /// Quiescence window, 5 seconds when unset.
    pub debounce_time: Option<Duration>,
    /// Per-instance stream name discriminator, the construction time in
    /// milliseconds when unset.
    pub stream_salt: Option<i64>,
}

/// Validated logger configuration.
#[derive(Clone)]
pub struct LoggerConfig {
    pub client: Arc<dyn LogStreamClient>,
    pub log_group_name: String,
    pub debounce_time: Duration,
    pub stream_salt: Option<i64>,
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field("client", &self.client.as_ref().map(|_| "<client>"))
            .field("log_group_name", &self.log_group_name)
            .field("debounce_time", &self.debounce_time)
            .field("stream_salt", &self.stream_salt)
            .finish()
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("log_group_name", &self.log_group_name)
            .field("debounce_time", &self.debounce_time)
            .field("stream_salt", &self.stream_salt)
            .finish_non_exhaustive()
    }
}

impl LoggerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the group name and debounce time from `CLOUDWATCH_LOG_GROUP_NAME`
    /// and `CLOUDWATCH_DEBOUNCE_TIME_MS`. The client still has to be set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_group_name = read_env(ENV_LOG_GROUP_NAME)?;
        let debounce_time = match read_env(ENV_DEBOUNCE_TIME_MS)? {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidEnv {
                        name: ENV_DEBOUNCE_TIME_MS,
                        value,
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            log_group_name,
            debounce_time,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn client(mut self, client: Arc<dyn LogStreamClient>) -> Self {
        self.client = Some(client);
        self
    }

    #[must_use]
    pub fn log_group_name(mut self, log_group_name: impl Into<String>) -> Self {
        self.log_group_name = Some(log_group_name.into());
        self
    }

    #[must_use]
    pub fn debounce_time(mut self, debounce_time: Duration) -> Self {
        self.debounce_time = Some(debounce_time);
        self
    }

    #[must_use]
    pub fn stream_salt(mut self, salt: i64) -> Self {
        self.stream_salt = Some(salt);
        self
    }

    /// Checks required options and fills in defaults. The client is checked
    /// before the group name.
    pub fn validate(self) -> Result<LoggerConfig, ConfigError> {
        let client = self.client.ok_or(ConfigError::MissingClient)?;

        let log_group_name = self
            .log_group_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(ConfigError::MissingLogGroupName)?;

        let debounce_time = self.debounce_time.unwrap_or(DEFAULT_DEBOUNCE_TIME);
        if debounce_time.is_zero() {
            return Err(ConfigError::InvalidDebounceTime);
        }

        Ok(LoggerConfig {
            client,
            log_group_name,
            debounce_time,
            stream_salt: self.stream_salt,
        })
    }
}

/// Unset is `None`, a value that is not valid unicode is an error.
fn read_env(name: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(value)) => Err(ConfigError::InvalidEnv {
            name,
            value: value.to_string_lossy().into_owned(),
        }),
    }
}

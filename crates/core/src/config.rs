// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline configuration: TOML file load and validation.
//!
//! Read once at startup; immutable afterwards. Wrapper order in the file
//! defines both the default entry stage and the escalation ladder, so
//! wrappers are an ordered `[[wrappers]]` array.

use crate::pipeline::Pipeline;
use crate::{JOB_MANAGER, JOB_ROUTER};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no wrappers were found, at least one wrapper must be defined")]
    NoWrappers,

    #[error("wrapper '{0}' is defined more than once")]
    DuplicateWrapper(String),

    #[error("wrapper name '{0}' is reserved for the routing protocol")]
    ReservedWrapper(String),
}

/// Broker connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

/// Declaration and consumption flags for one broker queue.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    pub name: String,
    pub durable: bool,
    pub delete_when_unused: bool,
    pub exclusive: bool,
    pub no_wait: bool,
    #[serde(default)]
    pub no_local: bool,
    pub auto_ack: bool,
}

/// Address of a downstream reporting service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

/// Full router configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub wrappers: Vec<QueueConfig>,
    /// The job-manager queue intake consumes.
    pub jobs: QueueConfig,
    pub status: ServiceConfig,
    pub storage: ServiceConfig,
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&raw)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Broker connection URL with inline credentials.
    pub fn amqp_url(&self) -> String {
        format!(
            "amqp://{}:{}@{}:{}/",
            self.server.user, self.server.password, self.server.host, self.server.port
        )
    }

    /// Build the immutable stage order from the wrapper list.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.wrappers.iter().map(|w| w.name.clone()).collect())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.wrappers.is_empty() {
            return Err(ConfigError::NoWrappers);
        }
        let mut seen = HashSet::new();
        for wrapper in &self.wrappers {
            // Stage names share a namespace with the protocol origins; a
            // stage called "JobRouter" would alias the shutdown marker.
            if wrapper.name == JOB_MANAGER || wrapper.name == JOB_ROUTER {
                return Err(ConfigError::ReservedWrapper(wrapper.name.clone()));
            }
            if !seen.insert(wrapper.name.as_str()) {
                return Err(ConfigError::DuplicateWrapper(wrapper.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

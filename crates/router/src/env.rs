// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the router binary.

use std::path::PathBuf;
use std::time::Duration;

/// Default config file location
pub const DEFAULT_CONFIG_FILE: &str = "/etc/shunt/config.toml";

/// Resolve the config file: `SHUNT_CONFIG_FILE` > `/etc/shunt/config.toml`
pub fn config_file() -> PathBuf {
    std::env::var("SHUNT_CONFIG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Per-call report timeout (default 5s, configurable via `SHUNT_HTTP_TIMEOUT_MS`).
pub fn http_timeout() -> Duration {
    std::env::var("SHUNT_HTTP_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

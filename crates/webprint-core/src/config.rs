// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WebprintError};

/// Environment variable that overrides [`ClientConfig::server_url`].
pub const SERVER_ENV: &str = "WEBPRINT_SERVER";

/// Settings for talking to the print service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the print service (the `/api/...` routes hang off it).
    pub server_url: String,
    /// Seconds between the end of one status fetch and the start of the next.
    pub poll_interval_secs: u64,
    /// Largest document the service accepts (16 MiB).
    pub max_upload_bytes: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            poll_interval_secs: 3,
            max_upload_bytes: 16 * 1024 * 1024,
            user_agent: format!("webprint/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Load settings from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the `WEBPRINT_SERVER` override, if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SERVER_ENV)
            && !url.trim().is_empty()
        {
            self.server_url = url;
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(WebprintError::Config("server_url must not be empty".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(WebprintError::Config(
                "poll_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

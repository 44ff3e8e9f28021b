//! Engine configuration: parsing and defaults.
//!
//! All tunables live in one TOML-backed struct passed into the
//! [`Synchronizer`](crate::sync::Synchronizer) constructor; there is no
//! ambient global configuration. Every field has a default, so an empty TOML
//! document (or [`SyncConfig::default`]) is a valid configuration.
//!
//! Entrypoints:
//! - Parse from a TOML string: [`load_config_str`]
//! - Parse from a file path: [`load_config_path`]
//!
//! The remote API credential is not part of this struct; the provider reads
//! `COMICVINE_API_KEY` from the environment when it is constructed.

use anyhow::Context;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use toml::from_str;

/// Tunables for the cache and synchronization engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SyncConfig {
    /// How long a successfully fetched volume stays fresh, in hours.
    pub volume_ttl_hours: i64,
    /// How long a successfully ingested issue stays fresh, in hours.
    pub issue_ttl_hours: i64,
    /// Per-request HTTP timeout, in seconds. Finite timeouts are what make
    /// the priming wall-clock budget enforceable.
    pub http_timeout_secs: u64,
    /// Wall-clock budget for one range-priming pass, in seconds. Sized to
    /// run inline within a user-facing request.
    pub prime_budget_secs: u64,
    /// Page size for issue listings (the remote API's maximum).
    pub page_size: u32,
    /// Safety cap on pages fetched per volume during ad-hoc ingestion.
    pub volume_page_cap: u32,
    /// TTL for a week row once priming completed, in hours.
    pub week_complete_ttl_hours: i64,
    /// TTL for a week row that is incomplete or failed, in seconds; short so
    /// the next request resumes promptly.
    pub week_retry_ttl_secs: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            volume_ttl_hours: 144,
            issue_ttl_hours: 720,
            http_timeout_secs: 8,
            prime_budget_secs: 10,
            page_size: 500,
            volume_page_cap: 3,
            week_complete_ttl_hours: 168,
            week_retry_ttl_secs: 60,
        }
    }
}

impl SyncConfig {
    /// Volume TTL as a duration.
    pub fn volume_ttl(&self) -> Duration {
        Duration::hours(self.volume_ttl_hours)
    }

    /// Issue TTL as a duration.
    pub fn issue_ttl(&self) -> Duration {
        Duration::hours(self.issue_ttl_hours)
    }

    /// Completed-week TTL as a duration.
    pub fn week_complete_ttl(&self) -> Duration {
        Duration::hours(self.week_complete_ttl_hours)
    }

    /// Incomplete/failed-week TTL as a duration.
    pub fn week_retry_ttl(&self) -> Duration {
        Duration::seconds(self.week_retry_ttl_secs)
    }

    /// HTTP timeout as a std duration (for the provider constructor).
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }

    /// Priming budget as a std duration (for the wall-clock budget).
    pub fn prime_budget(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.prime_budget_secs)
    }
}

/// Parse a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<SyncConfig> {
    from_str(toml_str).context("failed to parse sync config TOML")
}

/// Read a configuration TOML file from disk and parse it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<SyncConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}

//! Environment-driven engine configuration.
//!
//! The embedding process provides the clinic identity and collaborator
//! endpoints via environment variables; [`EngineConfig::from_env`] reads
//! and validates them once at startup. Nothing else in the crate touches
//! the environment.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::context::ClinicContext;
use crate::poll::PollConfig;

/// Configuration failures surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("missing required environment variable: {name}")]
    MissingVar {
        /// The variable's name.
        name: &'static str,
    },

    /// A variable was present but unparseable.
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar {
        /// The variable's name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base URL of the console API the collaborators live behind.
    pub api_base_url: String,

    /// Clinic this process operates for.
    pub clinic_id: String,

    /// Scheduling-system site id for the appointment feed.
    pub customer_site_id: Option<i64>,

    /// Polling cadence and failure policy.
    pub poll: PollConfig,
}

impl EngineConfig {
    /// Reads configuration from the environment.
    ///
    /// Required: `API_BASE_URL`, `CLINIC_ID`. Optional: `CUSTOMER_SITE_ID`
    /// (integer), `POLL_INTERVAL_MS` (integer milliseconds),
    /// `POLL_MAX_FAILURES` (integer; `0` disables the cap).
    ///
    /// # Errors
    ///
    /// [`ConfigError`] naming the first missing or unparseable variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = required("API_BASE_URL")?;
        if api_base_url.contains("localhost") || api_base_url.contains("127.0.0.1") {
            warn!("API_BASE_URL points at localhost; remote workers will not reach it");
        }
        let clinic_id = required("CLINIC_ID")?;

        let customer_site_id = optional_parsed::<i64>("CUSTOMER_SITE_ID")?;

        let mut poll = PollConfig::default();
        if let Some(ms) = optional_parsed::<u64>("POLL_INTERVAL_MS")? {
            poll.interval = Duration::from_millis(ms);
        }
        if let Some(cap) = optional_parsed::<u32>("POLL_MAX_FAILURES")? {
            poll.max_consecutive_failures = (cap > 0).then_some(cap);
        }

        Ok(Self {
            api_base_url,
            clinic_id,
            customer_site_id,
            poll,
        })
    }

    /// The clinic context this configuration describes.
    pub fn clinic_context(&self) -> ClinicContext {
        ClinicContext {
            clinic_id: self.clinic_id.clone(),
            customer_site_id: self.customer_site_id,
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

fn optional_parsed<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation: these tests set distinct variable values and
    // restore them, and the ones that race are combined into one test.
    #[test]
    fn from_env_reads_and_validates() {
        let saved: Vec<(&str, Option<String>)> = [
            "API_BASE_URL",
            "CLINIC_ID",
            "CUSTOMER_SITE_ID",
            "POLL_INTERVAL_MS",
            "POLL_MAX_FAILURES",
        ]
        .into_iter()
        .map(|name| (name, env::var(name).ok()))
        .collect();

        env::remove_var("API_BASE_URL");
        env::remove_var("CLINIC_ID");
        assert_eq!(
            EngineConfig::from_env(),
            Err(ConfigError::MissingVar {
                name: "API_BASE_URL"
            })
        );

        env::set_var("API_BASE_URL", "https://console.example.com");
        assert_eq!(
            EngineConfig::from_env(),
            Err(ConfigError::MissingVar { name: "CLINIC_ID" })
        );

        env::set_var("CLINIC_ID", "clinic-a");
        env::set_var("CUSTOMER_SITE_ID", "31");
        env::set_var("POLL_INTERVAL_MS", "1500");
        env::set_var("POLL_MAX_FAILURES", "0");

        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.clinic_id, "clinic-a");
        assert_eq!(config.customer_site_id, Some(31));
        assert_eq!(config.poll.interval, Duration::from_millis(1500));
        assert_eq!(config.poll.max_consecutive_failures, None);
        assert_eq!(config.clinic_context().clinic_id, "clinic-a");

        env::set_var("CUSTOMER_SITE_ID", "not-a-number");
        assert!(matches!(
            EngineConfig::from_env(),
            Err(ConfigError::InvalidVar {
                name: "CUSTOMER_SITE_ID",
                ..
            })
        ));

        for (name, value) in saved {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }
    }
}

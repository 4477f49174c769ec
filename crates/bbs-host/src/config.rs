use std::env;

use crate::ConfigError;

pub const DEFAULT_REGISTRATION_NUMBER: &str = "97771457";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Host-wide settings shared by every module and channel.
///
/// Only constructed through validating paths, so the registration number is
/// always 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// 8-digit GSBL registration number reported to modules.
    ///
    /// Environment variable: `BBS_REGISTRATION_NUMBER`.
    registration_number: String,

    /// Log filter (tracing-subscriber EnvFilter syntax).
    ///
    /// Environment variable: `BBS_LOG`.
    log_filter: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            registration_number: DEFAULT_REGISTRATION_NUMBER.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl HostConfig {
    pub fn new(
        registration_number: impl Into<String>,
        log_filter: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            registration_number: registration_number.into(),
            log_filter: log_filter.into(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Missing or blank values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key).and_then(|v| {
                let v = v.trim().to_string();
                (!v.is_empty()).then_some(v)
            })
        };

        Self::new(
            non_empty("BBS_REGISTRATION_NUMBER")
                .unwrap_or_else(|| DEFAULT_REGISTRATION_NUMBER.to_string()),
            non_empty("BBS_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        )
    }

    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let number = &self.registration_number;
        if number.len() != 8 || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidRegistrationNumber(number.clone()));
        }
        Ok(())
    }

    /// The registration number as modules see it: ASCII digits plus a NUL.
    pub fn registration_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.registration_number.len() + 1);
        bytes.extend_from_slice(self.registration_number.as_bytes());
        bytes.push(0);
        bytes
    }
}

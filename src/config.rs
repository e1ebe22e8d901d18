//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The bucket count is fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP interface binds to
    pub bind_address: IpAddr,
    /// HTTP server port
    pub server_port: u16,
    /// Number of independently locked buckets keys are spread over
    pub bucket_count: usize,
    /// Interval in seconds between expiry sweeps of each bucket
    pub sweep_interval: u64,
    /// Interval in seconds between memory usage refreshes for the info endpoint
    pub info_refresh_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset variables take their default. A variable that is set but does
    /// not parse is an error rather than a silent fallback.
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS` - Interface to listen on (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 4000)
    /// - `BUCKET_COUNT` - Number of buckets, positive (default: 16)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `INFO_REFRESH_INTERVAL` - Memory usage refresh in seconds (default: 10)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            bind_address: parse_var(&lookup, "BIND_ADDRESS", defaults.bind_address)?,
            server_port: parse_var(&lookup, "SERVER_PORT", defaults.server_port)?,
            bucket_count: parse_var(&lookup, "BUCKET_COUNT", defaults.bucket_count)?,
            sweep_interval: parse_var(&lookup, "SWEEP_INTERVAL", defaults.sweep_interval)?,
            info_refresh_interval: parse_var(
                &lookup,
                "INFO_REFRESH_INTERVAL",
                defaults.info_refresh_interval,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(CacheError::InvalidConfiguration(
                "BUCKET_COUNT must be positive".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::InvalidConfiguration(
                "SWEEP_INTERVAL must be positive".to_string(),
            ));
        }
        if self.info_refresh_interval == 0 {
            return Err(CacheError::InvalidConfiguration(
                "INFO_REFRESH_INTERVAL must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CacheError::InvalidConfiguration(format!("{} has invalid value '{}'", name, raw))
        }),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::from([0, 0, 0, 0]),
            server_port: 4000,
            bucket_count: 16,
            sweep_interval: 60,
            info_refresh_interval: 10,
        }
    }
}

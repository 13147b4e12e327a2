//! Service configuration from environment variables.

use crate::filter::{FilterCriteria, DEFAULT_DATE_RANGE_DAYS};
use external_services::eonet::{DEFAULT_LIMIT, EONET_BASE_URL};
use external_services::open_meteo::OPEN_METEO_BASE_URL;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub http_port: u16,
    pub metrics_port: u16,
    pub eonet_base_url: String,
    pub open_meteo_base_url: String,
    /// Zero disables the periodic reload.
    pub refresh_interval_secs: u64,
    pub event_limit: u32,
    /// Initial date window in days. Zero means no window.
    pub default_days: u32,
    /// Zero means no timeout.
    pub http_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            metrics_port: 9092,
            eonet_base_url: EONET_BASE_URL.to_string(),
            open_meteo_base_url: OPEN_METEO_BASE_URL.to_string(),
            refresh_interval_secs: 300,
            event_limit: DEFAULT_LIMIT,
            default_days: DEFAULT_DATE_RANGE_DAYS,
            http_timeout_secs: 0,
        }
    }
}

impl ServiceConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Missing or unparseable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            http_port: parse_or(&lookup, "HTTP_PORT", defaults.http_port),
            metrics_port: parse_or(&lookup, "METRICS_PORT", defaults.metrics_port),
            eonet_base_url: lookup("EONET_BASE_URL").unwrap_or(defaults.eonet_base_url),
            open_meteo_base_url: lookup("OPEN_METEO_BASE_URL")
                .unwrap_or(defaults.open_meteo_base_url),
            refresh_interval_secs: parse_or(
                &lookup,
                "REFRESH_INTERVAL_SECS",
                defaults.refresh_interval_secs,
            ),
            event_limit: parse_or(&lookup, "EVENT_LIMIT", defaults.event_limit),
            default_days: parse_or(&lookup, "DEFAULT_DAYS", defaults.default_days),
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
        }
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        (self.http_timeout_secs > 0).then(|| Duration::from_secs(self.http_timeout_secs))
    }

    /// Criteria the store starts with.
    pub fn initial_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date_range_days: (self.default_days > 0).then_some(self.default_days),
            ..FilterCriteria::default()
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {}='{}', using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(300)));
        assert_eq!(config.http_timeout(), None);
        assert_eq!(config.initial_criteria(), FilterCriteria::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HTTP_PORT", "3000"),
            ("EONET_BASE_URL", "http://localhost:9000/api/v3"),
            ("REFRESH_INTERVAL_SECS", "0"),
            ("DEFAULT_DAYS", "0"),
            ("HTTP_TIMEOUT_SECS", "15"),
        ]);
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.eonet_base_url, "http://localhost:9000/api/v3");
        assert_eq!(config.refresh_interval(), None);
        assert_eq!(config.initial_criteria().date_range_days, None);
        assert_eq!(config.http_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_unparseable_value_falls_back() {
        let config = config_from(&[("HTTP_PORT", "eighty"), ("EVENT_LIMIT", "-5")]);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.event_limit, 100);
    }
}

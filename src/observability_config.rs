//! # Observability Configuration
//!
//! `ENVIRONMENT` picks a baseline (log level, trace sampling); individual
//! variables such as `LOG_LEVEL` or `METRICS_PORT` then override it.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Deployment environment, selecting the observability baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Logging, metrics export and trace export settings
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub environment: Environment,
    /// OTLP collector for trace export; no export when unset
    pub otlp_endpoint: Option<String>,
    /// Port of the `/metrics` and `/health/*` server
    pub metrics_port: u16,
    /// Log level for the bot's own targets
    pub log_level: String,
    pub enable_trace_sampling: bool,
    /// Fraction of traces kept when sampling (0.0-1.0)
    pub trace_sampling_ratio: f64,
    pub enable_metrics_export: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl ObservabilityConfig {
    /// Baseline settings for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let (log_level, enable_trace_sampling, trace_sampling_ratio) = match environment {
            Environment::Development => ("debug", false, 1.0),
            Environment::Staging => ("info", true, 0.5),
            Environment::Production => ("warn", true, 0.1),
        };

        Self {
            environment,
            otlp_endpoint: None,
            metrics_port: 9090,
            log_level: log_level.to_string(),
            enable_trace_sampling,
            trace_sampling_ratio,
            enable_metrics_export: true,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// Unset keys keep the baseline of the selected environment; set but
    /// unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        let mut config = Self::for_environment(environment);

        if let Some(endpoint) = lookup("OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            config.otlp_endpoint = Some(endpoint);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(port) = lookup("METRICS_PORT") {
            config.metrics_port = parse_value("METRICS_PORT", &port)?;
        }
        if let Some(enabled) = lookup("ENABLE_TRACE_SAMPLING") {
            config.enable_trace_sampling = parse_value("ENABLE_TRACE_SAMPLING", &enabled)?;
        }
        if let Some(ratio) = lookup("TRACE_SAMPLING_RATIO") {
            config.trace_sampling_ratio = parse_value("TRACE_SAMPLING_RATIO", &ratio)?;
        }
        if let Some(enabled) = lookup("ENABLE_METRICS_EXPORT") {
            config.enable_metrics_export = parse_value("ENABLE_METRICS_EXPORT", &enabled)?;
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(endpoint) = &self.otlp_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!("Invalid OTLP endpoint format: {}", endpoint));
            }
        }

        if !(0.0..=1.0).contains(&self.trace_sampling_ratio) {
            return Err(format!("Invalid trace sampling ratio: {}", self.trace_sampling_ratio));
        }

        if self.metrics_port == 0 {
            return Err(format!("Invalid metrics port: {}", self.metrics_port));
        }

        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} has an invalid value: {}", key, value))
}

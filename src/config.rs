use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Browser
    pub chrome_path: Option<String>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub nav_timeout: Duration,

    // Readiness polling
    pub readiness_max_iterations: u32,
    pub readiness_poll_delay: Duration,
    pub scroll_step_px: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // Browser
            chrome_path: optional_env("CHROME_PATH"),
            viewport_width: parse_env_u32("VIEWPORT_WIDTH", 1260)?,
            viewport_height: parse_env_u32("VIEWPORT_HEIGHT", 900)?,
            nav_timeout: Duration::from_secs(parse_env_u64("NAV_TIMEOUT_SECS", 120)?),

            // Readiness polling
            readiness_max_iterations: parse_env_u32("READINESS_MAX_ITERATIONS", 120)?,
            readiness_poll_delay: Duration::from_millis(parse_env_u64(
                "READINESS_POLL_DELAY_MS",
                80,
            )?),
            scroll_step_px: parse_env_u32("SCROLL_STEP_PX", 900)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::InvalidValue {
                name: "VIEWPORT_WIDTH/VIEWPORT_HEIGHT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.nav_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "NAV_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.readiness_max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                name: "READINESS_MAX_ITERATIONS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env().unwrap();
        assert_eq!(config.nav_timeout, Duration::from_secs(120));
        assert_eq!(config.readiness_max_iterations, 120);
        assert_eq!(config.readiness_poll_delay, Duration::from_millis(80));
        assert_eq!(config.scroll_step_px, 900);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_u64_default() {
        assert_eq!(parse_env_u64("NONEXISTENT_VAR", 42).unwrap(), 42);
    }

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or_default("NONEXISTENT_VAR", "fallback"), "fallback");
    }
}

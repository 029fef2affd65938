//! HTTP server configuration parsing from environment variables.

use super::parse_var;
use anyhow::{Result, bail};

/// Server environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEnvConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    /// Replace 500 error messages with a generic text.
    pub redact_internal_errors: bool,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_bytes: 2 * 1024 * 1024,
            redact_internal_errors: false,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            max_body_bytes: parse_var(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
            redact_internal_errors: parse_var(
                &lookup,
                "REDACT_INTERNAL_ERRORS",
                defaults.redact_internal_errors,
            )?,
        };

        if config.max_body_bytes == 0 {
            bail!("MAX_BODY_BYTES must be positive");
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerEnvConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert!(!config.redact_internal_errors);
    }

    #[test]
    fn test_server_config_rejects_bad_port() {
        let result = ServerEnvConfig::from_lookup(|key| {
            (key == "PORT").then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }
}

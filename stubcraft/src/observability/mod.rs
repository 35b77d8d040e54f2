//! Observability (logging)
//!
//! Log lines go to stderr. Stdout carries only command output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted for the log filter
pub const LOG_ENV: &str = "STUBCRAFT_LOG";

/// Initialize the logging stack
///
/// Sets up:
/// - Environment-based log level filtering via `STUBCRAFT_LOG`
/// - Compact human formatting, or JSON when `config.json` is set
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.default_level()));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}

/// Observability configuration
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Emit debug-level pipeline events
    pub verbose: bool,

    /// Format log lines as JSON
    pub json: bool,
}

impl ObservabilityConfig {
    /// Enable verbose logging
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable JSON formatting
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Filter directive used when `STUBCRAFT_LOG` is unset
    #[must_use]
    pub const fn default_level(&self) -> &'static str {
        if self.verbose {
            "stubcraft=debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert!(!config.verbose);
        assert!(!config.json);
        assert_eq!(config.default_level(), "warn");
    }

    #[test]
    fn test_builder() {
        let config = ObservabilityConfig::default().with_verbose(true).with_json();
        assert!(config.verbose);
        assert!(config.json);
        assert_eq!(config.default_level(), "stubcraft=debug");
    }
}

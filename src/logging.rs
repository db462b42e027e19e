//! Diagnostic logging setup.
//!
//! Logs go to stderr; stdout is reserved for what the operator reads.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use crate::config::{ConfigError, ConfigResult, LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG` (if given) or the configured level.
pub fn build_filter(level: &str, rust_log: Option<&str>) -> ConfigResult<EnvFilter> {
    let directives = rust_log.filter(|s| !s.trim().is_empty()).unwrap_or(level);
    EnvFilter::try_new(directives)
        .map_err(|e| ConfigError::validation("logging.level", e.to_string()))
}

/// Install the global subscriber. Calling it twice keeps the first one.
pub fn init(config: &LoggingConfig) -> ConfigResult<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config.level, rust_log.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_level_is_used_without_rust_log() {
        let filter = build_filter("debug", None).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_wins() {
        let filter = build_filter("warn", Some("serial_listen=trace")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));

        let filter = build_filter("warn", Some("  ")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let result = build_filter("serial_listen=notalevel", None);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref key, .. }) if key == "logging.level"
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default();
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }
}

//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "SERIAL_LISTEN";

/// Config file name looked up in the working directory
const LOCAL_CONFIG_FILE_NAME: &str = "serial-listen.toml";

/// Config file name inside the per-user config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config directory
const APP_DIR_NAME: &str = "serial-listen";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "SERIAL_LISTEN_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `explicit` path (the `--config` flag); it must exist
    /// 2. `SERIAL_LISTEN_CONFIG` environment variable; it must exist too
    /// 3. `./serial-listen.toml` (current directory)
    /// 4. `<config dir>/serial-listen/config.toml`
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from(path);
        }

        let config_path = resolve_config_path()?;

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
///
/// `Ok(None)` means no file was found and the defaults apply.
fn resolve_config_path() -> ConfigResult<Option<PathBuf>> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some(path));
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    // 3. Platform config directory
    Ok(user_config_path().filter(|path| path.exists()))
}

/// `<config dir>/serial-listen/config.toml`, when the platform has a config dir.
fn user_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

fn env_var(key: &str) -> Option<(String, String)> {
    let name = format!("{}_{}", ENV_PREFIX, key);
    std::env::var(&name).ok().map(|val| (name, val))
}

fn parse_env<T: std::str::FromStr>(name: &str, val: &str, what: &str) -> ConfigResult<T> {
    val.trim()
        .parse()
        .map_err(|_| ConfigError::env_parse(name, format!("Invalid {what}: {val:?}")))
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `SERIAL_LISTEN_<KEY>`
/// For example:
/// - `SERIAL_LISTEN_DEVICE=/dev/ttyUSB0`
/// - `SERIAL_LISTEN_BAUD=9600`
/// - `SERIAL_LISTEN_WINDOW_SECS=30`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    if let Some((_, val)) = env_var("DEVICE") {
        config.serial.device = val;
    }
    if let Some((name, val)) = env_var("BAUD") {
        config.serial.baud_rate = parse_env(&name, &val, "baud rate")?;
    }
    if let Some((name, val)) = env_var("TIMEOUT_MS") {
        config.serial.timeout_ms = parse_env(&name, &val, "timeout")?;
    }
    if let Some((name, val)) = env_var("WINDOW_SECS") {
        config.listen.window_secs = parse_env(&name, &val, "window")?;
    }
    if let Some((name, val)) = env_var("POLL_INTERVAL_MS") {
        config.listen.poll_interval_ms = parse_env(&name, &val, "poll interval")?;
    }
    if let Some((_, val)) = env_var("LOG_LEVEL") {
        config.logging.level = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_env_override() {
        env::set_var("SERIAL_LISTEN_DEVICE", "/dev/ttyUSB3");
        env::set_var("SERIAL_LISTEN_BAUD", "57600");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);

        env::remove_var("SERIAL_LISTEN_DEVICE");
        env::remove_var("SERIAL_LISTEN_BAUD");

        result.unwrap();
        assert_eq!(config.serial.device, "/dev/ttyUSB3");
        assert_eq!(config.serial.baud_rate, 57600);
    }

    #[test]
    #[serial]
    fn test_bad_env_value_is_reported() {
        env::set_var("SERIAL_LISTEN_WINDOW_SECS", "forever");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);
        assert!(matches!(
            result,
            Err(ConfigError::EnvParseError { ref var, .. }) if var == "SERIAL_LISTEN_WINDOW_SECS"
        ));

        env::remove_var("SERIAL_LISTEN_WINDOW_SECS");
    }

    #[test]
    #[serial]
    fn test_missing_explicit_path() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/serial-listen.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_user_config_path_layout() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with("serial-listen/config.toml"));
        }
    }
}

//! Configuration file and environment resolution.

use pretty_assertions::assert_eq;
use serial_listen::config::{ConfigError, ConfigLoader, LogFormat};
use serial_listen::port::Parity;
use serial_listen::ListenSettings;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
#[serial]
fn explicit_file_is_loaded() {
    let file = write_config(
        r#"
        [serial]
        device = "/dev/ttyUSB0"
        baud_rate = 9600
        parity = "even"

        [listen]
        window_secs = 30
        poll_interval_ms = 50
        label = "RX: "

        [logging]
        format = "json"
        "#,
    );

    let loader = ConfigLoader::load(Some(file.path())).unwrap();
    let config = loader.config();

    assert_eq!(loader.config_path.as_deref(), Some(file.path()));
    assert_eq!(config.serial.device, "/dev/ttyUSB0");
    assert_eq!(config.serial.baud_rate, 9600);
    assert_eq!(config.serial.parity, Parity::Even);
    assert_eq!(config.listen.label, "RX: ");
    assert_eq!(config.logging.format, LogFormat::Json);

    let settings = ListenSettings::from_config(config);
    assert_eq!(settings.window, Duration::from_secs(30));
    assert_eq!(settings.poll_interval, Duration::from_millis(50));
    assert_eq!(settings.read_timeout, Duration::from_secs(1));
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let file = write_config("[serial]\ndevice = \"/dev/ttyUSB0\"\n");
    std::env::set_var("SERIAL_LISTEN_DEVICE", "/dev/ttyACM1");
    std::env::set_var("SERIAL_LISTEN_POLL_INTERVAL_MS", "20");

    let result = ConfigLoader::load_from(file.path());

    std::env::remove_var("SERIAL_LISTEN_DEVICE");
    std::env::remove_var("SERIAL_LISTEN_POLL_INTERVAL_MS");

    let config = result.unwrap().into_config();
    assert_eq!(config.serial.device, "/dev/ttyACM1");
    assert_eq!(config.listen.poll_interval_ms, 20);
}

#[test]
#[serial]
fn config_path_from_env_var() {
    let file = write_config("[listen]\nwindow_secs = 5\n");
    std::env::set_var("SERIAL_LISTEN_CONFIG", file.path());

    let result = ConfigLoader::load(None);

    std::env::remove_var("SERIAL_LISTEN_CONFIG");

    let loader = result.unwrap();
    assert_eq!(loader.config_path.as_deref(), Some(file.path()));
    assert_eq!(loader.config().listen.window_secs, 5.0);
}

#[test]
#[serial]
fn missing_env_config_path_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = dir.path().join("absent.toml");
    std::env::set_var("SERIAL_LISTEN_CONFIG", &missing);

    let result = ConfigLoader::load(None);

    std::env::remove_var("SERIAL_LISTEN_CONFIG");

    match result {
        Err(ConfigError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
#[serial]
fn malformed_file_is_a_parse_error() {
    let file = write_config("[serial\ndevice = ");

    let result = ConfigLoader::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
#[serial]
fn loaded_values_are_validated_by_caller() {
    let file = write_config("[listen]\nwindow_secs = -1\n");

    let config = ConfigLoader::load(Some(file.path())).unwrap().into_config();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

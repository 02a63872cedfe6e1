use super::builder::default_config_content;
use super::loading::parse;
use super::validation::validate_config;
use super::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn with_xdg_config_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir);
    }

    let result = f();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
    result
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("sunclock").join("sunclock.toml");

    let result = with_xdg_config_home(temp_dir.path(), Config::load);

    if let Err(e) = &result {
        eprintln!("Config::load() failed: {:?}", e);
    }
    assert!(result.is_ok());
    assert!(config_path.exists());
}

#[test]
#[serial]
fn test_config_load_existing_file() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("sunclock");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("sunclock.toml"),
        "ntp_server = \"pool.ntp.org\"\nsunset_offset = 15\n",
    )
    .unwrap();

    let config = with_xdg_config_home(temp_dir.path(), Config::load).unwrap();

    assert_eq!(config.ntp_server(), "pool.ntp.org");
    assert_eq!(config.sunset_offset(), 15);
}

#[test]
fn test_default_content_parses_to_defaults() {
    let config = parse(&default_config_content()).unwrap();

    assert_eq!(config.ntp_server(), DEFAULT_NTP_SERVER);
    assert_eq!(config.ntp_port(), DEFAULT_NTP_PORT);
    assert_eq!(config.local_port(), DEFAULT_LOCAL_PORT);
    assert_eq!(config.sync_timeout(), Duration::from_millis(1500));
    assert_eq!(config.sync_interval(), Duration::from_secs(300));
    assert_eq!(config.check_interval(), Duration::from_secs(60));
    assert_eq!(config.sunset_offset(), 0);
    assert_eq!(config.sunrise_override, None);

    let location = config.location();
    assert!((location.latitude - DEFAULT_LATITUDE).abs() < 1e-6);
    assert!((location.longitude - DEFAULT_LONGITUDE).abs() < 1e-6);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.ntp_server(), "europe.pool.ntp.org");
    assert_eq!(config.location(), Location::default());
}

#[test]
fn test_full_config_parses() {
    let config = parse(
        r#"
        ntp_server = "time.example.org"
        ntp_port = 1123
        local_port = 0
        sync_timeout_ms = 2000
        sync_interval = 600
        check_interval = 30
        latitude = 40.4168
        longitude = -3.7038
        sunset_offset = -10
        sunrise_override = 360
        "#,
    )
    .unwrap();

    assert_eq!(config.ntp_server(), "time.example.org");
    assert_eq!(config.ntp_port(), 1123);
    assert_eq!(config.local_port(), 0);
    assert_eq!(config.sync_timeout(), Duration::from_secs(2));
    assert_eq!(config.sync_interval(), Duration::from_secs(600));
    assert_eq!(config.check_interval(), Duration::from_secs(30));
    assert_eq!(config.location(), Location::new(40.4168, -3.7038));
    assert_eq!(config.sunset_offset(), -10);
    assert_eq!(config.sunrise_override, Some(360));
}

#[test]
fn test_unknown_key_rejected() {
    assert!(parse("night_temp = 3300").is_err());
}

#[test]
fn test_config_validation_ranges() {
    let cases = [
        "ntp_server = \"  \"",
        "ntp_port = 0",
        "sync_timeout_ms = 50",
        "sync_timeout_ms = 60001",
        "sync_interval = 5",
        "sync_interval = 86401",
        "check_interval = 0",
        "check_interval = 3601",
        "latitude = 90.5",
        "longitude = -180.5",
        "sunset_offset = 721",
        "sunrise_override = -1",
        "sunrise_override = 1440",
    ];

    for case in cases {
        let config: Config = toml::from_str(case).unwrap();
        assert!(
            validate_config(&config).is_err(),
            "expected '{case}' to be rejected"
        );
    }
}

#[test]
fn test_config_validation_limits_inclusive() {
    let cases = [
        "sync_timeout_ms = 100",
        "sync_timeout_ms = 60000",
        "sync_interval = 10",
        "check_interval = 3600",
        "latitude = -90.0",
        "longitude = 180.0",
        "sunset_offset = -720",
        "sunrise_override = 0",
        "sunrise_override = 1439",
    ];

    for case in cases {
        let config: Config = toml::from_str(case).unwrap();
        assert!(
            validate_config(&config).is_ok(),
            "expected '{case}' to be accepted"
        );
    }
}

#[test]
fn test_load_from_path_missing_file() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("sunclock.toml");
    assert!(Config::load_from_path(&missing).is_err());
}

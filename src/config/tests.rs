use std::io::Write;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("http://file.example/api/".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = ClientOverrides {
        api_url: Some("https://cli.example/api".to_string()),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.api.base_url.as_str(), "https://cli.example/api/");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_are_applied() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.api.base_url.as_str(), DEFAULT_API_BASE_URL);
    assert_eq!(settings.toasts.default_duration, Duration::from_millis(5000));
    assert_eq!(settings.logging.level, LevelFilter::WARN);
    assert!(settings.session.token_file.ends_with("session.token"));
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn base_url_gains_trailing_slash_and_rejects_other_schemes() {
    let url = normalize_base_url("http://localhost:8000/api?x=1").expect("normalize");
    assert_eq!(url.as_str(), "http://localhost:8000/api/");
    assert_eq!(
        url.join("auth/login/").expect("join").as_str(),
        "http://localhost:8000/api/auth/login/"
    );

    let mut raw = RawSettings::default();
    raw.api.base_url = Some("ftp://example.com/".to_string());
    let err = Settings::from_raw(raw).expect_err("ftp must be rejected");
    assert!(matches!(err, LoadError::Invalid { key: "api.base_url", .. }));
}

#[test]
fn invalid_log_level_is_reported() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(err, LoadError::Invalid { key: "logging.level", .. }));
}

#[test]
fn cli_json_logging_and_sticky_toasts() {
    let mut raw = RawSettings::default();
    raw.apply_overrides(&ClientOverrides {
        log_json: Some(true),
        toast_duration_ms: Some(0),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
    assert!(settings.toasts.default_duration.is_zero());
}

#[test]
fn explicit_config_file_is_layered_under_cli() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp config");
    writeln!(
        file,
        "[api]\nbase_url = \"http://from-file:9000/api\"\n\n[session]\ntoken_file = \"/tmp/devlink-test.token\"\n\n[toasts]\ndefault_duration_ms = 2500"
    )
    .expect("write config");

    let settings = load(Some(file.path()), &ClientOverrides::default()).expect("load");
    assert_eq!(settings.api.base_url.as_str(), "http://from-file:9000/api/");
    assert_eq!(
        settings.session.token_file,
        PathBuf::from("/tmp/devlink-test.token")
    );
    assert_eq!(settings.toasts.default_duration, Duration::from_millis(2500));

    let overridden = load(
        Some(file.path()),
        &ClientOverrides {
            token_file: Some(PathBuf::from("/tmp/other.token")),
            ..Default::default()
        },
    )
    .expect("load with override");
    assert_eq!(overridden.session.token_file, PathBuf::from("/tmp/other.token"));
}

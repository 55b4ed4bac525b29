use super::*;

#[test]
fn defaults_resolve_without_any_input() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.board.name, DEFAULT_BOARD_NAME);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid { key: "server.port", .. })
    ));
}

#[test]
fn blank_board_name_falls_back_to_default() {
    let mut raw = RawSettings::default();
    raw.board.name = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.board.name, DEFAULT_BOARD_NAME);
}

#[test]
fn invalid_log_level_is_reported() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid { key: "logging.level", .. })
    ));
}

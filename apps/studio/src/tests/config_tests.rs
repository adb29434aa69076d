use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_point_at_public_gemini_models() {
    let settings = settings_from_sources(None, env_from(&[])).expect("settings");
    assert_eq!(settings.api_base_url, "https://generativelanguage.googleapis.com");
    assert_eq!(settings.text_model, "gemini-2.5-flash");
    assert_eq!(settings.image_model, "imagen-4.0-generate-001");
    assert_eq!(settings.edit_model, "gemini-2.5-flash-image-preview");
    assert_eq!(settings.edit_mode, EditMode::ContextAware);
    assert_eq!(settings.default_style, Style::Cartoon);
    assert!(settings.api_key.is_none());
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        api_base_url = "http://localhost:9000"
        text_model = "gemini-2.0-flash"
        edit_mode = "context-free"
        default_style = "minimalist"
        output_dir = "./out"
        log_filter = "debug"
    "#;
    let settings = settings_from_sources(Some(raw), env_from(&[])).expect("settings");
    assert_eq!(settings.api_base_url, "http://localhost:9000");
    assert_eq!(settings.text_model, "gemini-2.0-flash");
    assert_eq!(settings.image_model, "imagen-4.0-generate-001");
    assert_eq!(settings.edit_mode, EditMode::ContextFree);
    assert_eq!(settings.default_style, Style::Minimalist);
    assert_eq!(settings.output_dir, PathBuf::from("./out"));
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn environment_overrides_file() {
    let raw = r#"text_model = "from-file""#;
    let settings = settings_from_sources(
        Some(raw),
        env_from(&[
            ("MNEMONIC_TEXT_MODEL", "from-env"),
            ("MNEMONIC_EDIT_MODE", "free"),
            ("MNEMONIC_LOG", "warn"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.text_model, "from-env");
    assert_eq!(settings.edit_mode, EditMode::ContextFree);
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn gemini_api_key_wins_over_legacy_name() {
    let settings = settings_from_sources(
        None,
        env_from(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "preferred")]),
    )
    .expect("settings");
    assert_eq!(settings.api_key.as_deref(), Some("preferred"));

    let settings =
        settings_from_sources(None, env_from(&[("API_KEY", "legacy")])).expect("settings");
    assert_eq!(settings.api_key.as_deref(), Some("legacy"));
}

#[test]
fn missing_api_key_is_reported_before_any_call() {
    let settings = settings_from_sources(None, env_from(&[])).expect("settings");
    let err = settings.gemini_config().expect_err("must fail");
    assert!(err.to_string().contains("GEMINI_API_KEY"));

    let settings =
        settings_from_sources(None, env_from(&[("GEMINI_API_KEY", "  ")])).expect("settings");
    assert!(settings.gemini_config().is_err());
}

#[test]
fn gemini_config_carries_models_and_key() {
    let settings = settings_from_sources(
        Some(r#"edit_model = "custom-edit""#),
        env_from(&[("GEMINI_API_KEY", "k")]),
    )
    .expect("settings");
    let config = settings.gemini_config().expect("config");
    assert_eq!(config.api_key, "k");
    assert_eq!(config.edit_model, "custom-edit");
}

#[test]
fn unknown_keys_and_bad_edit_modes_are_rejected() {
    assert!(settings_from_sources(Some(r#"api_key = "nope""#), env_from(&[])).is_err());
    assert!(settings_from_sources(Some(r#"edit_mode = "sideways""#), env_from(&[])).is_err());
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");
    assert!(load_settings(Some(&missing)).is_err());

    let present = dir.path().join("studio.toml");
    std::fs::write(&present, "image_model = \"imagen-3\"\n").expect("write");
    let settings = load_settings(Some(&present)).expect("settings");
    assert_eq!(settings.image_model, "imagen-3");
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use client_core::{gemini, GeminiConfig};
use serde::Deserialize;
use shared::domain::{EditMode, Style};

pub const DEFAULT_CONFIG_FILE: &str = "mnemonic.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
    pub edit_model: String,
    pub edit_mode: EditMode,
    pub default_style: Style,
    pub output_dir: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: gemini::DEFAULT_BASE_URL.into(),
            api_key: None,
            text_model: gemini::DEFAULT_TEXT_MODEL.into(),
            image_model: gemini::DEFAULT_IMAGE_MODEL.into(),
            edit_model: gemini::DEFAULT_EDIT_MODEL.into(),
            edit_mode: EditMode::ContextAware,
            default_style: Style::Cartoon,
            output_dir: PathBuf::from("."),
            log_filter: "info".into(),
        }
    }
}

/// Keys accepted in `mnemonic.toml`. There is no API key entry:
/// credentials only come from the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    text_model: Option<String>,
    image_model: Option<String>,
    edit_model: Option<String>,
    edit_mode: Option<String>,
    default_style: Option<String>,
    output_dir: Option<PathBuf>,
    log_filter: Option<String>,
}

impl Settings {
    pub fn gemini_config(&self) -> anyhow::Result<GeminiConfig> {
        let Some(api_key) = self.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            bail!("missing API key: set GEMINI_API_KEY or API_KEY in the environment");
        };
        Ok(GeminiConfig {
            base_url: self.api_base_url.clone(),
            api_key,
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
            edit_model: self.edit_model.clone(),
        })
    }
}

/// Defaults, then the config file, then the process environment.
///
/// An explicit `path` must exist; the default `mnemonic.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid config file")?;
        apply_file(&mut settings, file_cfg)?;
    }

    if let Some(v) = env("API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env("GEMINI_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env("MNEMONIC_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("MNEMONIC_TEXT_MODEL") {
        settings.text_model = v;
    }
    if let Some(v) = env("MNEMONIC_IMAGE_MODEL") {
        settings.image_model = v;
    }
    if let Some(v) = env("MNEMONIC_EDIT_MODEL") {
        settings.edit_model = v;
    }
    if let Some(v) = env("MNEMONIC_EDIT_MODE") {
        settings.edit_mode = parse_edit_mode(&v)?;
    }
    if let Some(v) = env("MNEMONIC_OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }
    if let Some(v) = env("MNEMONIC_LOG") {
        settings.log_filter = v;
    }

    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) -> anyhow::Result<()> {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.text_model {
        settings.text_model = v;
    }
    if let Some(v) = file_cfg.image_model {
        settings.image_model = v;
    }
    if let Some(v) = file_cfg.edit_model {
        settings.edit_model = v;
    }
    if let Some(v) = file_cfg.edit_mode {
        settings.edit_mode = parse_edit_mode(&v)?;
    }
    if let Some(v) = file_cfg.default_style {
        settings.default_style = Style::from_tag(&v);
    }
    if let Some(v) = file_cfg.output_dir {
        settings.output_dir = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn parse_edit_mode(raw: &str) -> anyhow::Result<EditMode> {
    EditMode::parse(raw)
        .with_context(|| format!("unknown edit mode '{raw}' (use context-aware or context-free)"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

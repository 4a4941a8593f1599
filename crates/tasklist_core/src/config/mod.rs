use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLIST_CONFIG_PATH";
const DEFAULT_DISMISS_AFTER_MS: u64 = 3000;

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;78m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned = canonical_key(raw);
    if cleaned.is_empty() {
        return Some("default".into());
    }

    match cleaned.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

/// Lowercases and collapses every run of non-alphanumerics into one `_`.
pub fn canonical_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

/// Where the "task added" acknowledgment is shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeBackend {
    /// Printed inline by the session.
    #[default]
    Terminal,
    /// Sent to the desktop notification service.
    Desktop,
    Off,
}

impl FromStr for NoticeBackend {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_key(raw).as_str() {
            "terminal" | "inline" => Ok(Self::Terminal),
            "desktop" | "system" => Ok(Self::Desktop),
            "off" | "none" | "disabled" => Ok(Self::Off),
            _ => Err(AppError::invalid_input(format!(
                "unknown notice backend '{}'",
                raw.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeConfig {
    #[serde(default)]
    pub backend: NoticeBackend,
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            backend: NoticeBackend::default(),
            dismiss_after_ms: DEFAULT_DISMISS_AFTER_MS,
        }
    }
}

impl NoticeConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

fn default_dismiss_after_ms() -> u64 {
    DEFAULT_DISMISS_AFTER_MS
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub notice: NoticeConfig,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub aliases: HashMap<String, String>,
    pub notice_backend: Option<NoticeBackend>,
    pub dismiss_after_ms: Option<u64>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    }
}

/// Loads the user config, falling back to defaults when it is unusable.
/// A missing file is not an error; a broken one is reported alongside the
/// defaults so the caller can warn and carry on.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

pub fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_deref()
        && let Some(normalized) = canonical_theme_name(theme)
    {
        merged.theme = Some(normalized);
    }

    for (alias, value) in &overrides.aliases {
        merged.aliases.insert(alias.clone(), value.clone());
    }

    if let Some(backend) = overrides.notice_backend {
        merged.notice.backend = backend;
    }
    if let Some(ms) = overrides.dismiss_after_ms {
        merged.notice.dismiss_after_ms = ms;
    }

    merged
}

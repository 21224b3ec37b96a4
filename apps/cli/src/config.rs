use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "docuflow.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: None,
            log_level: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Defaults, then the config file, then environment. An explicitly named file
/// must exist; the default file is optional.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match explicit_path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_settings_file(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DOCUFLOW_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    if let Some(v) = lookup("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

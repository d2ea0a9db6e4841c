use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};

pub const SETTINGS_FILE: &str = "user_directory.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings =
            toml::from_str(raw).context("failed to parse settings file")?;
        if let Some(v) = file_cfg.api_url {
            self.api_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    /// Later names win, so `APP__*` overrides the plain variable.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for name in ["USER_DIRECTORY_API_URL", "APP__API_URL"] {
            if let Some(v) = lookup(name).filter(|v| !v.trim().is_empty()) {
                self.api_url = v;
            }
        }
        for name in ["USER_DIRECTORY_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"] {
            if let Some(parsed) = lookup(name).and_then(|v| v.trim().parse::<u64>().ok()) {
                self.request_timeout_secs = parsed;
            }
        }
    }

    /// Command-line flags, applied last.
    pub fn apply_overrides(&mut self, api_url: Option<String>, request_timeout_secs: Option<u64>) {
        if let Some(v) = api_url {
            self.api_url = v;
        }
        if let Some(v) = request_timeout_secs {
            self.request_timeout_secs = v;
        }
    }
}

/// Defaults, then the settings file, then environment variables.
///
/// An explicit `path` must be readable. Without one, `user_directory.toml` in
/// the working directory is read when it exists.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let explicit = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
    if let Some(raw) = read_settings_file(path, explicit)? {
        settings
            .apply_file(&raw)
            .with_context(|| format!("invalid settings in '{}'", path.display()))?;
    }

    settings.apply_env(|name| std::env::var(name).ok());
    Ok(settings)
}

/// `Ok(None)` only for an implicit file that does not exist.
fn read_settings_file(path: &Path, explicit: bool) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if !explicit && err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err)
            .with_context(|| format!("failed to read settings file '{}'", path.display())),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{DEFAULT_API_BASE_URL, DEFAULT_MAX_RESULTS, MAX_RESULTS, MIN_RESULTS};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "event-client.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_max_results: u32,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: 120,
            default_max_results: DEFAULT_MAX_RESULTS,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// File layer, then environment. An explicitly named file must exist; the
/// default one is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match config_path {
        Some(path) => read_file(path)?.with_context(|| {
            format!("config file '{}' does not exist", path.display())
        })?,
        None => read_file(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_file(path: &Path) -> anyhow::Result<Option<Settings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let settings = toml::from_str(&raw)
        .with_context(|| format!("invalid config file '{}'", path.display()))?;
    Ok(Some(settings))
}

pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("EVENT_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("EVENT_API_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("EVENT_API_TIMEOUT_SECS must be whole seconds, got '{v}'"))?;
    }

    if let Some(v) = lookup("APP__DEFAULT_MAX_RESULTS") {
        settings.default_max_results = v
            .trim()
            .parse()
            .with_context(|| format!("APP__DEFAULT_MAX_RESULTS must be a number, got '{v}'"))?;
    }

    Ok(())
}

/// Checks the merged settings and normalizes the base URL.
pub fn finalize(mut settings: Settings) -> anyhow::Result<Settings> {
    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    if settings.request_timeout_secs == 0 {
        bail!("request timeout must be at least one second");
    }
    if !(MIN_RESULTS..=MAX_RESULTS).contains(&settings.default_max_results) {
        bail!(
            "default max results must be between {MIN_RESULTS} and {MAX_RESULTS}, got {}",
            settings.default_max_results
        );
    }
    Ok(settings)
}

fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid API base URL '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("API base URL must use http or https, got '{}'", url.scheme());
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "http://nexifytw.mynetgear.com:45000/api/Record/GetRecords";
pub const SETTINGS_FILE: &str = "gateway.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub upstream_url: Url,
    pub request_timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    upstream_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug)]
struct RawSettings {
    bind_addr: String,
    upstream_url: String,
    request_timeout_secs: u64,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            upstream_url: DEFAULT_UPSTREAM_URL.into(),
            request_timeout_secs: 30,
        }
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut raw = RawSettings::default();

    if let Ok(contents) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&contents) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    raw.bind_addr = v;
                }
                if let Some(v) = file_cfg.upstream_url {
                    raw.upstream_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    raw.request_timeout_secs = v;
                }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable gateway settings file");
            }
        }
    }

    for key in ["GATEWAY_BIND", "APP__BIND_ADDR"] {
        if let Some(v) = env(key) {
            raw.bind_addr = v;
        }
    }

    for key in ["GATEWAY_UPSTREAM_URL", "APP__UPSTREAM_URL"] {
        if let Some(v) = env(key) {
            raw.upstream_url = v;
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            raw.request_timeout_secs = parsed;
        }
    }

    let upstream_url = Url::parse(raw.upstream_url.trim())
        .with_context(|| format!("invalid upstream url '{}'", raw.upstream_url))?;

    Ok(Settings {
        bind_addr: raw.bind_addr,
        upstream_url,
        request_timeout: Duration::from_secs(raw.request_timeout_secs.max(1)),
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

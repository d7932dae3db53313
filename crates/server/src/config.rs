use std::{fs, net::SocketAddr};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub max_body_bytes: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            max_body_bytes: 64 * 1024,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    max_body_bytes: Option<usize>,
    log_filter: Option<String>,
}

impl Settings {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server_bind
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.server_bind))
    }
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(raw.as_deref(), |key: &str| std::env::var(key).ok())
}

/// File values override defaults; environment overrides both.
fn settings_from_sources(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.max_body_bytes {
                    settings.max_body_bytes = v;
                }
                if let Some(v) = file_cfg.log_filter {
                    settings.log_filter = v;
                }
            }
            Err(error) => {
                warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(port) = env("PORT") {
        if let Ok(port) = port.parse::<u16>() {
            settings.server_bind = format!("0.0.0.0:{port}");
        }
    }
    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__MAX_BODY_BYTES") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_body_bytes = parsed;
        }
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

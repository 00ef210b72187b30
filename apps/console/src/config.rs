use std::{fs, io, path::Path};

use anyhow::Context;
use client_core::{PageSize, DEFAULT_API_URL};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub page_size: PageSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            page_size: PageSize::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    page_size: Option<RawPageSize>,
}

// `page_size = 50` and `page_size = "all"` are both accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPageSize {
    Number(u32),
    Text(String),
}

impl RawPageSize {
    fn to_text(&self) -> String {
        match self {
            Self::Number(limit) => limit.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(file) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse '{}'", file.display()))?;
            if let Some(v) = file_cfg.api_url {
                settings.api_url = v;
            }
            if let Some(v) = file_cfg.page_size {
                settings.page_size = parse_page_size(&v.to_text())
                    .with_context(|| format!("invalid page_size in '{}'", file.display()))?;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", file.display()));
        }
    }

    if let Some(v) = env("API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        settings.page_size = parse_page_size(&v).context("invalid APP__PAGE_SIZE")?;
    }

    Ok(settings)
}

fn parse_page_size(raw: &str) -> anyhow::Result<PageSize> {
    Ok(raw.parse::<PageSize>()?)
}

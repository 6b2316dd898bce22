use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use server_api::Catalog;
use tracing::info;

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub default_center: String,
    pub catalog_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8443".into(),
            default_center: "Bezos Center".into(),
            catalog_path: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `server.toml` keys, then environment variables.
pub(crate) fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("default_center") {
                settings.default_center = v.clone();
            }
            if let Some(v) = file_cfg.get("catalog_path") {
                settings.catalog_path = Some(v.clone());
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__DEFAULT_CENTER") {
        settings.default_center = v;
    }

    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = Some(v);
    }

    settings
}

/// The configured catalog file, or the built-in catalog when none is set.
pub fn load_catalog(settings: &Settings) -> anyhow::Result<Catalog> {
    let Some(path) = settings.catalog_path.as_deref() else {
        info!("no catalog_path configured; serving built-in catalog");
        return Ok(Catalog::builtin());
    };
    let path = Path::new(path);
    let catalog = Catalog::load(path)
        .with_context(|| format!("catalog_path is set to '{}'", path.display()))?;
    info!(path = %path.display(), centers = catalog.centers.len(), "loaded catalog");
    Ok(catalog)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

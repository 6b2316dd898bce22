use std::{fs, path::Path};

use serde::Deserialize;
use tracing::warn;

/// Binds a button to the one table it swaps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScopedSwap {
    pub control: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Tables whose id starts with this are transposed on page-ready.
    /// Empty disables the convention.
    pub vertical_prefix: String,
    /// Control that transposes every table on the page when clicked.
    pub swapper_control: String,
    pub transpose_all_on_ready: bool,
    pub scoped: Vec<ScopedSwap>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_prefix: "vertical".into(),
            swapper_control: "tableSwapper".into(),
            transpose_all_on_ready: false,
            scoped: Vec::new(),
        }
    }
}

pub const DEFAULT_LAYOUT_FILE: &str = "layout.toml";

/// Defaults, then the TOML file (if present and readable), then `APP__*`
/// environment overrides.
pub fn load_layout_config(path: Option<&Path>) -> LayoutConfig {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_LAYOUT_FILE));
    let mut config = match fs::read_to_string(path) {
        Ok(raw) => parse_layout_config(&raw).unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "ignoring unreadable layout config");
            LayoutConfig::default()
        }),
        Err(_) => LayoutConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

pub fn parse_layout_config(raw: &str) -> Result<LayoutConfig, toml::de::Error> {
    toml::from_str(raw)
}

pub(crate) fn apply_env_overrides(
    config: &mut LayoutConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("APP__VERTICAL_PREFIX") {
        config.vertical_prefix = v;
    }
    if let Some(v) = lookup("APP__SWAPPER_CONTROL") {
        config.swapper_control = v;
    }
    if let Some(v) = lookup("APP__TRANSPOSE_ALL_ON_READY") {
        if let Ok(parsed) = v.parse::<bool>() {
            config.transpose_all_on_ready = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_layout_config("vertical_prefix = \"vert\"").expect("parse");
        assert_eq!(config.vertical_prefix, "vert");
        assert_eq!(config.swapper_control, "tableSwapper");
        assert!(!config.transpose_all_on_ready);
    }

    #[test]
    fn scoped_swaps_parse_from_array_of_tables() {
        let raw = r#"
            transpose_all_on_ready = true

            [[scoped]]
            control = "swap_requests"
            table = "requests_table"
        "#;
        let config = parse_layout_config(raw).expect("parse");
        assert!(config.transpose_all_on_ready);
        assert_eq!(
            config.scoped,
            vec![ScopedSwap {
                control: "swap_requests".into(),
                table: "requests_table".into(),
            }]
        );
    }

    #[test]
    fn env_overrides_win_and_bad_bools_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("APP__VERTICAL_PREFIX", "vert_table"),
            ("APP__TRANSPOSE_ALL_ON_READY", "maybe"),
        ]);
        let mut config = LayoutConfig::default();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.vertical_prefix, "vert_table");
        assert!(!config.transpose_all_on_ready);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_layout_config(Some(&dir.path().join("absent.toml")));
        assert_eq!(config.swapper_control, LayoutConfig::default().swapper_control);
    }
}

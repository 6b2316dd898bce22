use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use anyhow::Context;
use serde::Deserialize;
use shared::{
    domain::SelectionOption,
    error::{ApiError, ErrorCode},
    protocol::LookupResponse,
};
use tracing::debug;

const MAX_CENTER_BYTES: usize = 256;

/// Which microscopes each imaging center operates, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub centers: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let mut centers = BTreeMap::new();
        centers.insert(
            "Bezos Center".to_string(),
            vec![
                "light sheet microscope".to_string(),
                "two photon microscope".to_string(),
            ],
        );
        centers.insert(
            "McDonnell Center".to_string(),
            vec!["confocal microscope".to_string()],
        );
        Self { centers }
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog '{}'", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("failed to parse catalog '{}'", path.display()))
    }

    pub fn microscopes(&self, center: &str) -> &[String] {
        self.centers.get(center).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct ApiContext {
    pub catalog: Arc<Catalog>,
    pub default_center: String,
}

/// Microscopes of `center` as `[value, label]` pairs. A missing center falls
/// back to the configured default; an unknown one yields an empty list.
pub fn list_microscopes(
    ctx: &ApiContext,
    center: Option<&str>,
) -> Result<LookupResponse, ApiError> {
    let center = center.unwrap_or(ctx.default_center.as_str());
    if center.len() > MAX_CENTER_BYTES {
        return Err(ApiError::new(ErrorCode::Validation, "center name is too long"));
    }

    let response: LookupResponse = ctx
        .catalog
        .microscopes(center)
        .iter()
        .map(|name| SelectionOption::new(name.as_str(), name.as_str()))
        .collect();
    debug!(center, microscopes = response.0.len(), "listed microscopes");
    Ok(response)
}

pub fn list_centers(ctx: &ApiContext) -> LookupResponse {
    ctx.catalog
        .centers
        .keys()
        .map(|center| SelectionOption::new(center.as_str(), center.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ApiContext {
        ApiContext {
            catalog: Arc::new(Catalog::builtin()),
            default_center: "Bezos Center".into(),
        }
    }

    #[test]
    fn lists_microscopes_for_known_center() {
        let response = list_microscopes(&ctx(), Some("McDonnell Center")).expect("list");
        assert_eq!(
            response.0,
            vec![(
                "confocal microscope".to_string(),
                "confocal microscope".to_string()
            )]
        );
    }

    #[test]
    fn missing_center_uses_default() {
        let response = list_microscopes(&ctx(), None).expect("list");
        assert_eq!(response.0.len(), 2);
        assert_eq!(response.0[0].0, "light sheet microscope");
    }

    #[test]
    fn unknown_center_is_empty_not_an_error() {
        assert!(list_microscopes(&ctx(), Some("")).expect("list").0.is_empty());
        assert!(list_microscopes(&ctx(), Some("Nowhere")).expect("list").0.is_empty());
    }

    #[test]
    fn oversized_center_is_rejected() {
        let long = "x".repeat(MAX_CENTER_BYTES + 1);
        let err = list_microscopes(&ctx(), Some(long.as_str())).expect_err("too long");
        assert_eq!(err.code, ErrorCode::Validation);
    }

    #[test]
    fn catalog_parses_from_toml() {
        let raw = r#"
            [centers]
            "Bezos Center" = ["lavision", "smartspim"]
        "#;
        let catalog = Catalog::from_toml(raw).expect("parse");
        assert_eq!(catalog.microscopes("Bezos Center"), ["lavision", "smartspim"]);
        assert!(catalog.microscopes("McDonnell Center").is_empty());
    }

    #[test]
    fn centers_are_listed_sorted() {
        let centers = list_centers(&ctx());
        assert_eq!(centers.0[0].0, "Bezos Center");
        assert_eq!(centers.0[1].0, "McDonnell Center");
    }
}

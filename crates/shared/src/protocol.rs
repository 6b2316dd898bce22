//! Wire format of the option lookup endpoint.
//!
//! The endpoint answers with a JSON array of two-element arrays,
//! `[["value", "label"], ...]`, in display order.

use serde::{Deserialize, Serialize};

use crate::domain::SelectionOption;

/// Route the lookup server mounts the facility lookup on.
pub const MICROSCOPE_LOOKUP_ROUTE: &str = "/_get_microscopes/";
pub const CENTER_QUERY_PARAM: &str = "center";

pub type OptionPair = (String, String);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupResponse(pub Vec<OptionPair>);

impl LookupResponse {
    pub fn into_options(self) -> Vec<SelectionOption> {
        self.0.into_iter().map(SelectionOption::from).collect()
    }
}

impl FromIterator<SelectionOption> for LookupResponse {
    fn from_iter<I: IntoIterator<Item = SelectionOption>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterQuery {
    pub center: Option<String>,
}

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{
    domain::SelectionOption,
    protocol::{LookupResponse, CENTER_QUERY_PARAM},
};
use thiserror::Error;
use tracing::debug;

/// Source of the child option set for a given parent value.
#[async_trait]
pub trait LookupSource: Send + Sync {
    async fn fetch_options(&self, parent_value: &str) -> Result<Vec<SelectionOption>>;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("lookup endpoint answered with status {status}")]
    Status { status: u16 },
    #[error("lookup body is not a list of [value, label] pairs: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub endpoint: String,
    pub param: String,
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8443/_get_microscopes/".into(),
            param: CENTER_QUERY_PARAM.into(),
            timeout_secs: 10,
        }
    }
}

/// Lookup over HTTP: `GET <endpoint>?<param>=<value>` answering with
/// `[["value", "label"], ...]`.
pub struct HttpLookup {
    http: Client,
    endpoint: String,
    param: String,
}

impl HttpLookup {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            param: CENTER_QUERY_PARAM.into(),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            param: config.param.clone(),
        })
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    pub async fn fetch(&self, parent_value: &str) -> Result<Vec<SelectionOption>, LookupError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[(self.param.as_str(), parent_value)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let options = serde_json::from_slice::<LookupResponse>(&body)?.into_options();
        debug!(
            endpoint = %self.endpoint,
            parent_value,
            options = options.len(),
            "lookup resolved"
        );
        Ok(options)
    }
}

#[async_trait]
impl LookupSource for HttpLookup {
    async fn fetch_options(&self, parent_value: &str) -> Result<Vec<SelectionOption>> {
        Ok(self.fetch(parent_value).await?)
    }
}

#[cfg(test)]
#[path = "tests/lookup_tests.rs"]
mod tests;

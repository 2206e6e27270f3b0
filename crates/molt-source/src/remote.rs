//! HTTP client for the agent network read API.
//!
//! Endpoints, relative to the configured base URL:
//!   GET /api/agents          -> [Agent]
//!   GET /api/agents/{id}     -> Agent, or 404
//!   GET /api/connections     -> [Connection]

use std::time::Duration;

use molt_protocol::{Agent, Connection};
use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};
use crate::source::{AgentSource, SourceFuture};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base address, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Sent as a bearer token when present.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Build a reqwest client with an optional bearer token and a request timeout.
pub(crate) fn build_http_client(api_key: Option<&str>, timeout_secs: u64) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    if let Some(key) = api_key {
        let value = header::HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| SourceError::InvalidConfig(format!("invalid API key: {e}")))?;
        headers.insert(header::AUTHORIZATION, value);
    }

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| SourceError::InvalidConfig(format!("invalid base url '{base_url}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(SourceError::InvalidConfig(format!("'{base_url}' cannot be a base url")));
    }
    Ok(url)
}

/// Read-only client for the agent network API.
pub struct RemoteSource {
    base_url: Url,
    client: Client,
}

impl RemoteSource {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_http_client(config.api_key.as_deref(), config.timeout_secs)?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidConfig(format!("'{}' cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET and decode. A 404 yields `Ok(None)`; other non-success statuses
    /// are errors.
    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Option<T>> {
        let url = self.endpoint(segments)?;
        tracing::debug!(url = %url, "Fetching");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Collections must exist; a 404 on a listing is a failure.
    async fn get_collection<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>> {
        match self.get_json(segments).await? {
            Some(items) => Ok(items),
            None => Err(SourceError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: self.endpoint(segments)?.to_string(),
            }),
        }
    }
}

impl AgentSource for RemoteSource {
    fn list_agents(&self) -> SourceFuture<'_, Vec<Agent>> {
        Box::pin(self.get_collection(&["api", "agents"]))
    }

    fn list_connections(&self) -> SourceFuture<'_, Vec<Connection>> {
        Box::pin(self.get_collection(&["api", "connections"]))
    }

    fn get_agent<'a>(&'a self, id: &'a str) -> SourceFuture<'a, Option<Agent>> {
        Box::pin(async move { self.get_json(&["api", "agents", id]).await })
    }

    fn describe(&self) -> String {
        format!("remote ({})", self.base_url)
    }
}

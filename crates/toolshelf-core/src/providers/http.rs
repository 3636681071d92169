//! HTTP transport for the catalog, settings and memory endpoints

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;

use super::error::{ProviderError, ProviderResult};
use super::response::{catalog_reply, passthrough_reply, settings_reply, CatalogResponse};
use super::traits::{CatalogProvider, MemoryBackend, SettingsProvider};
use crate::config::ToolshelfConfig;
use crate::logging::Logger;

/// reqwest-backed implementation of every collaborator trait
///
/// Endpoints:
/// - `GET {api_base}/api/tools/registry`
/// - `GET {api_base}/api/settings`
/// - `GET|DELETE {agent_url}/memory/{key}`, `GET {agent_url}/memory`
pub struct HttpBackend {
    client: Client,
    api_base: Url,
    agent_url: Url,
    logger: Arc<dyn Logger>,
}

impl HttpBackend {
    /// Build a backend from configuration
    pub fn from_config(config: &ToolshelfConfig, logger: Arc<dyn Logger>) -> ProviderResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Self::with_client(client, &config.api_base, &config.agent_url, logger)
    }

    /// Build a backend around an existing client
    pub fn with_client(
        client: Client,
        api_base: &str,
        agent_url: &str,
        logger: Arc<dyn Logger>,
    ) -> ProviderResult<Self> {
        Ok(Self {
            client,
            api_base: parse_base(api_base)?,
            agent_url: parse_base(agent_url)?,
            logger,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn agent_url(&self) -> &Url {
        &self.agent_url
    }

    /// Send a request and hand back status and body text
    async fn send(&self, method: Method, url: Url) -> ProviderResult<(u16, String)> {
        crate::log_debug!(self.logger, "[HttpBackend] {} {}", method, url);

        let response = self
            .client
            .request(method.clone(), url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                crate::log_error!(self.logger, "[HttpBackend] {} {} failed: {}", method, url, e);
                ProviderError::Http(e)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            crate::log_warn!(self.logger, "[HttpBackend] {} {} returned {}", method, url, status);
        }
        Ok((status, body))
    }
}

fn parse_base(base: &str) -> ProviderResult<Url> {
    let url = Url::parse(base).map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base, e)))?;
    if url.cannot_be_a_base() {
        return Err(ProviderError::InvalidUrl(base.to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one
///
/// `.` and `..` are refused; the URL parser would fold them into the
/// parent path.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> ProviderResult<Url> {
    if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
        return Err(ProviderError::InvalidUrl(format!(
            "path segment {:?} not allowed under {}",
            dot, base
        )));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl CatalogProvider for HttpBackend {
    async fn fetch_catalog(&self) -> ProviderResult<CatalogResponse> {
        let url = endpoint(&self.api_base, &["api", "tools", "registry"])?;
        let (status, body) = self.send(Method::GET, url).await?;
        catalog_reply(status, &body)
    }
}

#[async_trait]
impl SettingsProvider for HttpBackend {
    async fn fetch_settings(&self) -> ProviderResult<Value> {
        let url = endpoint(&self.api_base, &["api", "settings"])?;
        let (status, body) = self.send(Method::GET, url).await?;
        settings_reply(status, &body)
    }
}

#[async_trait]
impl MemoryBackend for HttpBackend {
    async fn get_memory(&self, key: &str) -> ProviderResult<Value> {
        let url = endpoint(&self.agent_url, &["memory", key])?;
        let (status, body) = self.send(Method::GET, url).await?;
        passthrough_reply(status, &body)
    }

    async fn delete_memory(&self, key: &str) -> ProviderResult<Value> {
        let url = endpoint(&self.agent_url, &["memory", key])?;
        let (status, body) = self.send(Method::DELETE, url).await?;
        passthrough_reply(status, &body)
    }

    async fn list_memory(&self) -> ProviderResult<Value> {
        let url = endpoint(&self.agent_url, &["memory"])?;
        let (status, body) = self.send(Method::GET, url).await?;
        passthrough_reply(status, &body)
    }
}

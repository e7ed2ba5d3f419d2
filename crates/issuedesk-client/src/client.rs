//! HTTP client for the issues collection
//!
//! `GET /`, `POST /`, `PUT /{id}` and `DELETE /{id}` under a fixed base URL.

use crate::Result;
use crate::error::{ClientError, Operation, detail_message};
use async_trait::async_trait;
use issuedesk_core::{Config, Issue, IssueUpdate, NewIssue};
use reqwest::{Client, ClientBuilder, Response, Url};
use serde::de::DeserializeOwned;

/// The operations the UI needs from the server.
///
/// Implemented by [`ApiClient`]; tests provide in-memory fakes.
#[async_trait]
pub trait IssueApi: Send + Sync {
    async fn list_issues(&self) -> Result<Vec<Issue>>;
    async fn create_issue(&self, payload: &NewIssue) -> Result<Issue>;
    async fn update_issue(&self, id: &str, payload: &IssueUpdate) -> Result<Issue>;
    async fn delete_issue(&self, id: &str) -> Result<()>;
}

/// reqwest-backed client for the issues endpoint
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the collection at `issues_url`
    /// (e.g. `http://localhost:8000/api/v1/issues`).
    pub fn new(issues_url: &str) -> Result<Self> {
        Self::with_http(issues_url, Client::new())
    }

    /// Create a client from configuration, honouring the optional timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Self::from_builder(&config.issues_url(), builder)
    }

    fn from_builder(issues_url: &str, builder: ClientBuilder) -> Result<Self> {
        let http = builder.build().map_err(ClientError::Build)?;
        Self::with_http(issues_url, http)
    }

    fn with_http(issues_url: &str, http: Client) -> Result<Self> {
        let base = Url::parse(issues_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", issues_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(issues_url.to_string()));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL of a single issue; the id is one percent-encoded path segment
    fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Turn a non-success response into a [`ClientError::Server`].
    async fn check(response: Response, op: Operation) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match op {
            Operation::List => None,
            _ => detail_message(&body),
        }
        .unwrap_or_else(|| op.fallback_message().to_string());

        tracing::warn!(?op, %status, %message, "request failed");
        Err(ClientError::Server { status, message })
    }

    async fn decode<T: DeserializeOwned>(response: Response, op: Operation) -> Result<T> {
        let response = Self::check(response, op).await?;
        response.json::<T>().await.map_err(ClientError::Decode)
    }
}

#[async_trait]
impl IssueApi for ApiClient {
    async fn list_issues(&self) -> Result<Vec<Issue>> {
        tracing::debug!(url = %self.base, "GET issues");
        let response = self
            .http
            .get(self.base.clone())
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, Operation::List).await
    }

    async fn create_issue(&self, payload: &NewIssue) -> Result<Issue> {
        tracing::debug!(url = %self.base, title = %payload.title, "POST issue");
        let response = self
            .http
            .post(self.base.clone())
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, Operation::Create).await
    }

    async fn update_issue(&self, id: &str, payload: &IssueUpdate) -> Result<Issue> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "PUT issue");
        let response = self
            .http
            .put(url)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::decode(response, Operation::Update).await
    }

    async fn delete_issue(&self, id: &str) -> Result<()> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "DELETE issue");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ClientError::Network)?;
        Self::check(response, Operation::Delete).await?;
        Ok(())
    }
}

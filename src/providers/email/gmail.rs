//! Gmail API mailbox implementation.
//!
//! This module provides a [`Mailbox`] implementation using the Gmail REST
//! API v1:
//!
//! - `users.messages.list` / `users.messages.get` for fetching
//! - `users.messages.modify` for read state and labels
//! - `users.messages.trash` for deletion
//! - `users.labels.*` for the label catalog
//!
//! Authentication is a bearer token obtained from a [`TokenSource`]; token
//! acquisition and refresh live outside this crate.
//!
//! Batch reads fan out one `get` per listed message id concurrently and
//! drop (with a warning) any message that fails to fetch or decode, so a
//! single bad message never fails a page.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::decode::{decode, MessageResource, UNREAD_LABEL_ID};
use super::labels::LabelCatalog;
use super::mapper::EmailMapper;
use super::traits::{Mailbox, ProviderError, Result, TokenSource};
use crate::domain::{Email, EmailId};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Gmail API message list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    messages: Option<Vec<MessageRef>>,
    #[allow(dead_code)]
    next_page_token: Option<String>,
}

/// Reference to a message in a list response.
#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

/// Gmail API label.
#[derive(Debug, Deserialize)]
struct LabelResource {
    id: String,
    name: String,
}

/// Gmail labels list response.
#[derive(Debug, Deserialize)]
struct LabelListResponse {
    labels: Option<Vec<LabelResource>>,
}

/// Gmail modify request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    add_label_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    remove_label_ids: Vec<String>,
}

impl ModifyRequest {
    fn add(label_id: &str) -> Self {
        Self {
            add_label_ids: vec![label_id.to_string()],
            remove_label_ids: vec![],
        }
    }

    fn remove(label_id: &str) -> Self {
        Self {
            add_label_ids: vec![],
            remove_label_ids: vec![label_id.to_string()],
        }
    }
}

/// Gmail create-label request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateLabelRequest {
    name: String,
    label_list_visibility: String,
    message_list_visibility: String,
}

/// Gmail API mailbox.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use breve::providers::email::{GmailMailbox, Mailbox, StaticToken};
///
/// let mailbox = GmailMailbox::new(Arc::new(StaticToken::new(token)));
/// let unread = mailbox.fetch_unread().await?;
/// ```
pub struct GmailMailbox {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    mapper: EmailMapper,
    page_size: u32,
}

impl GmailMailbox {
    /// Creates a mailbox talking to the public Gmail API.
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: GMAIL_API_BASE.to_string(),
            tokens,
            mapper: EmailMapper::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the API base URL (for tests or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the per-page result cap.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Overrides the HTTP client (useful for custom timeouts or proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the mapper, e.g. to invalidate the label cache.
    pub fn mapper(&self) -> &EmailMapper {
        &self.mapper
    }

    /// Builds authorization headers for API requests.
    async fn auth_headers(&self) -> Result<HeaderMap> {
        let token = self.tokens.access_token().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ProviderError::Internal(format!("invalid header: {}", e)))?,
        );
        Ok(headers)
    }

    /// Makes an authenticated GET request to the Gmail API.
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.auth_headers().await?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Like [`get`](Self::get), but a 404 becomes `Ok(None)`.
    async fn get_optional<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.auth_headers().await?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Makes an authenticated POST request to the Gmail API.
    async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut headers = self.auth_headers().await?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Makes an authenticated POST request that doesn't return a body.
    async fn post_no_response<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<()> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut headers = self.auth_headers().await?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }
        Ok(())
    }

    /// Makes an authenticated POST request with an empty body.
    async fn post_empty(&self, endpoint: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.auth_headers().await?;

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }
        Ok(())
    }

    /// Handles API response, checking for errors.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Internal(format!("parse response: {}", e)))
    }

    /// Handles API error responses.
    async fn handle_error(&self, response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => ProviderError::Authentication(format!("unauthorized: {}", body)),
            404 => ProviderError::NotFound(body),
            429 => ProviderError::RateLimited {
                retry_after_secs: retry_after,
            },
            _ => ProviderError::Provider(format!("API error ({}): {}", status, body)),
        }
    }

    /// Lists message ids for a message list endpoint.
    async fn list_ids(&self, endpoint: &str) -> Result<Vec<String>> {
        let response: MessageListResponse = self.get(endpoint).await?;
        Ok(response
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect())
    }

    /// Fetches the raw message resource for an id.
    async fn fetch_resource(&self, id: &str) -> Result<Option<MessageResource>> {
        self.get_optional(&format!("/messages/{}?format=raw", id))
            .await
    }

    /// Decodes and maps a single resource, logging and dropping failures.
    async fn assemble_one(&self, resource: &MessageResource) -> Option<Email> {
        let decoded = match decode(resource) {
            Some(decoded) => decoded,
            None => {
                tracing::warn!(message_id = %resource.id, "skipping undecodable message");
                return None;
            }
        };

        match self.mapper.map(self, decoded).await {
            Ok(email) => Some(email),
            Err(err) => {
                tracing::warn!(
                    message_id = %resource.id,
                    error = %err,
                    "skipping message failing domain validation"
                );
                None
            }
        }
    }

    /// Assembles a page of resources, preserving order and dropping failures.
    async fn assemble(&self, resources: Vec<MessageResource>) -> Vec<Email> {
        let mut emails = Vec::with_capacity(resources.len());
        for resource in &resources {
            if let Some(email) = self.assemble_one(resource).await {
                emails.push(email);
            }
        }
        emails
    }

    /// Fetches, decodes, and maps a list of message ids concurrently.
    async fn fetch_messages(&self, ids: Vec<String>) -> Vec<Email> {
        let fetches = ids.iter().map(|id| self.fetch_resource(id));
        let results = futures::future::join_all(fetches).await;

        let mut resources = Vec::with_capacity(ids.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(Some(resource)) => resources.push(resource),
                Ok(None) => {
                    tracing::warn!(message_id = %id, "message disappeared during batch fetch");
                }
                Err(err) => {
                    tracing::warn!(message_id = %id, error = %err, "skipping message that failed to fetch");
                }
            }
        }

        self.assemble(resources).await
    }

    /// Resolves a label display name to its provider id.
    async fn label_id_for_name(&self, name: &str) -> Result<Option<String>> {
        let response: LabelListResponse = self.get("/labels").await?;
        Ok(response
            .labels
            .unwrap_or_default()
            .into_iter()
            .find(|label| label.name == name)
            .map(|label| label.id))
    }

    /// Creates a user label on the provider and returns its id.
    async fn create_label(&self, name: &str) -> Result<String> {
        let request = CreateLabelRequest {
            name: name.to_string(),
            label_list_visibility: "labelShow".to_string(),
            message_list_visibility: "show".to_string(),
        };
        let created: LabelResource = self.post("/labels", &request).await?;

        tracing::info!(label = %name, label_id = %created.id, "created provider label");
        Ok(created.id)
    }

    /// Applies a modify request to a message.
    async fn modify(&self, id: &EmailId, body: &ModifyRequest) -> Result<()> {
        self.post_no_response(&format!("/messages/{}/modify", id), body)
            .await
    }
}

#[async_trait]
impl Mailbox for GmailMailbox {
    async fn fetch_by_id(&self, id: &EmailId) -> Result<Option<Email>> {
        let Some(resource) = self.fetch_resource(id.as_str()).await? else {
            return Ok(None);
        };
        Ok(self.assemble_one(&resource).await)
    }

    async fn fetch_all(&self, limit: u32) -> Result<Vec<Email>> {
        let cap = limit.min(self.page_size);
        let ids = self
            .list_ids(&format!("/messages?maxResults={}", cap))
            .await?;
        Ok(self.fetch_messages(ids).await)
    }

    async fn fetch_by_label(&self, label: &str) -> Result<Vec<Email>> {
        let Some(label_id) = self.label_id_for_name(label).await? else {
            return Ok(Vec::new());
        };
        let ids = self
            .list_ids(&format!(
                "/messages?labelIds={}&maxResults={}",
                label_id, self.page_size
            ))
            .await?;
        Ok(self.fetch_messages(ids).await)
    }

    async fn fetch_unread(&self) -> Result<Vec<Email>> {
        let ids = self
            .list_ids(&format!(
                "/messages?q=is:unread&maxResults={}",
                self.page_size
            ))
            .await?;
        Ok(self.fetch_messages(ids).await)
    }

    async fn create(&self, _email: &Email) -> Result<Email> {
        Err(ProviderError::Unsupported(
            "creating messages through the mailbox gateway".to_string(),
        ))
    }

    async fn trash(&self, id: &EmailId) -> Result<()> {
        self.post_empty(&format!("/messages/{}/trash", id)).await
    }

    async fn set_read(&self, id: &EmailId, read: bool) -> Result<()> {
        let body = if read {
            ModifyRequest::remove(UNREAD_LABEL_ID)
        } else {
            ModifyRequest::add(UNREAD_LABEL_ID)
        };
        self.modify(id, &body).await
    }

    async fn add_label(&self, id: &EmailId, label: &str) -> Result<()> {
        let label_id = match self.label_id_for_name(label).await? {
            Some(existing) => existing,
            None => self.create_label(label).await?,
        };
        self.modify(id, &ModifyRequest::add(&label_id)).await
    }

    async fn remove_label(&self, id: &EmailId, label: &str) -> Result<()> {
        let Some(label_id) = self.label_id_for_name(label).await? else {
            return Ok(());
        };
        self.modify(id, &ModifyRequest::remove(&label_id)).await
    }
}

#[async_trait]
impl LabelCatalog for GmailMailbox {
    async fn lookup_label_name(&self, id: &str) -> Result<Option<String>> {
        let label: Option<LabelResource> = self.get_optional(&format!("/labels/{}", id)).await?;
        Ok(label.map(|l| l.name))
    }
}

//! Mailbox provider contract.
//!
//! This module defines the [`Mailbox`] trait which abstracts over the remote
//! mail provider. The pipeline depends only on this narrow contract, so an
//! in-memory fake can stand in for the real provider in tests.

use async_trait::async_trait;

use crate::domain::{Email, EmailId};

/// Result type alias for mailbox provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur during mailbox provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Authentication failed or credentials expired.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, if known.
        retry_after_secs: Option<u64>,
    },

    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation the provider contract does not support.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// Provider-specific error.
    #[error("provider error: {0}")]
    Provider(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Source of bearer tokens for provider requests.
///
/// Credential acquisition and refresh happen outside this crate; the gateway
/// only ever asks for a token valid for the next request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns a bearer token valid for the next request.
    async fn access_token(&self) -> Result<String>;
}

/// Token source backed by a fixed, externally acquired token.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wraps an already-acquired access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Trait for mailbox provider implementations.
///
/// Read operations accept an identifier or label name plus a result-size cap
/// and return fully decoded [`Email`] entities. Mutation operations are
/// forwarded directly to the provider, which remains the source of truth for
/// read state and labels.
///
/// Batch reads degrade gracefully: a message that fails to fetch or decode
/// is dropped from the result, it never fails the batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Fetches a single email by id.
    ///
    /// Returns `Ok(None)` when the message does not exist or cannot be
    /// decoded into a domain entity.
    async fn fetch_by_id(&self, id: &EmailId) -> Result<Option<Email>>;

    /// Fetches up to `limit` emails, newest first.
    async fn fetch_all(&self, limit: u32) -> Result<Vec<Email>>;

    /// Fetches emails carrying the given label name.
    ///
    /// An unknown label yields an empty result, not an error.
    async fn fetch_by_label(&self, label: &str) -> Result<Vec<Email>>;

    /// Fetches unread emails.
    async fn fetch_unread(&self) -> Result<Vec<Email>>;

    /// Creating messages is not part of this contract.
    ///
    /// # Errors
    ///
    /// Always returns [`ProviderError::Unsupported`].
    async fn create(&self, email: &Email) -> Result<Email>;

    /// Moves the message to trash. Trashing an already-trashed message is
    /// not distinguished from success.
    async fn trash(&self, id: &EmailId) -> Result<()>;

    /// Marks the message read (`true`) or unread (`false`).
    async fn set_read(&self, id: &EmailId, read: bool) -> Result<()>;

    /// Applies a label by name, creating it on the provider first if needed.
    async fn add_label(&self, id: &EmailId, label: &str) -> Result<()>;

    /// Removes a label by name. Removing an unknown label is a no-op.
    async fn remove_label(&self, id: &EmailId, label: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_returns_wrapped_value() {
        let source = StaticToken::new("ya29.token");
        assert_eq!(source.access_token().await.unwrap(), "ya29.token");
    }

    #[test]
    fn provider_error_display() {
        let auth = ProviderError::Authentication("token expired".to_string());
        assert_eq!(auth.to_string(), "authentication failed: token expired");

        let rate = ProviderError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert!(rate.to_string().contains("rate limit"));

        let unsupported = ProviderError::Unsupported("creating messages".to_string());
        assert!(unsupported.to_string().contains("not supported"));
    }
}

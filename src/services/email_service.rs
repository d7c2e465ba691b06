//! Email use-case orchestration.
//!
//! [`EmailService`] is the surface consumed by the HTTP layer: it fetches
//! emails through the mailbox gateway, lazily enriches them with summaries,
//! and forwards mutations to the provider, which remains the source of
//! truth for read state and labels.

use std::sync::Arc;

use thiserror::Error;

use super::summary_service::SummaryService;
use crate::domain::{label_names, DomainError, Email, EmailId};
use crate::providers::ai::LlmError;
use crate::providers::email::{Mailbox, ProviderError};

/// Cap on a single fetch page.
pub const DEFAULT_FETCH_LIMIT: u32 = 100;

/// Errors surfaced to consumers of the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("email not found: {0}")]
    NotFound(EmailId),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("summary generation failed: {0}")]
    Summary(#[from] LlmError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Orchestrates the mailbox gateway and the summary generator.
pub struct EmailService {
    mailbox: Arc<dyn Mailbox>,
    summaries: SummaryService,
}

impl EmailService {
    /// Creates a service over a mailbox gateway and summarizer.
    pub fn new(mailbox: Arc<dyn Mailbox>, summaries: SummaryService) -> Self {
        Self { mailbox, summaries }
    }

    /// Fetches emails, lazily attaching a summary to each one lacking it.
    ///
    /// Decode failures have already degraded to omission inside the gateway;
    /// a summarization failure, by contrast, propagates to the caller rather
    /// than producing an email with a fabricated summary.
    pub async fn fetch(&self, unread_only: bool) -> Result<Vec<Email>> {
        let emails = if unread_only {
            self.mailbox.fetch_unread().await?
        } else {
            self.mailbox.fetch_all(DEFAULT_FETCH_LIMIT).await?
        };

        let mut enriched = Vec::with_capacity(emails.len());
        for email in emails {
            enriched.push(self.ensure_summary(email).await?);
        }
        Ok(enriched)
    }

    /// Fetches emails carrying the given label, without summarization.
    pub async fn fetch_by_label(&self, label: &str) -> Result<Vec<Email>> {
        Ok(self.mailbox.fetch_by_label(label).await?)
    }

    /// Fetches a single email by id.
    pub async fn get(&self, id: &EmailId) -> Result<Email> {
        self.mailbox
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    /// Fetches a single email and ensures it carries a summary.
    pub async fn summarize(&self, id: &EmailId) -> Result<Email> {
        let email = self.get(id).await?;
        self.ensure_summary(email).await
    }

    /// Marks an email as read.
    pub async fn mark_as_read(&self, id: &EmailId) -> Result<()> {
        self.get(id).await?;
        Ok(self.mailbox.set_read(id, true).await?)
    }

    /// Marks an email as unread.
    pub async fn mark_as_unread(&self, id: &EmailId) -> Result<()> {
        self.get(id).await?;
        Ok(self.mailbox.set_read(id, false).await?)
    }

    /// Archives an email: the inbox label is removed and the archive label
    /// added on the provider, whether or not the inbox label was present.
    pub async fn archive(&self, id: &EmailId) -> Result<()> {
        self.mailbox.remove_label(id, label_names::INBOX).await?;
        self.mailbox.add_label(id, label_names::ARCHIVE).await?;
        Ok(())
    }

    /// Moves an email to trash.
    pub async fn delete(&self, id: &EmailId) -> Result<()> {
        Ok(self.mailbox.trash(id).await?)
    }

    /// Applies a label by name.
    pub async fn add_label(&self, id: &EmailId, label: &str) -> Result<()> {
        Ok(self.mailbox.add_label(id, label).await?)
    }

    /// Removes a label by name.
    pub async fn remove_label(&self, id: &EmailId, label: &str) -> Result<()> {
        Ok(self.mailbox.remove_label(id, label).await?)
    }

    async fn ensure_summary(&self, email: Email) -> Result<Email> {
        if email.summary.is_some() {
            return Ok(email);
        }
        let points = self.summaries.generate(&email).await?;
        Ok(email.with_summary(points)?)
    }
}

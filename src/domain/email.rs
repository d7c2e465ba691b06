//! Email entity and summary types.
//!
//! [`Email`] is an immutable value: every mutation returns a new instance
//! rather than updating in place, so instances can be shared freely across
//! concurrent consumers. The provider remains the source of truth; these
//! values are rebuilt on every fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{label_names, DomainError, EmailAddress, EmailId};

/// Upper bound on summary points, enforced by [`EmailSummary::new`].
pub const MAX_SUMMARY_POINTS: usize = 10;

/// The canonical message entity produced by the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    /// Provider-assigned identifier.
    pub id: EmailId,
    /// Sender address.
    pub from: EmailAddress,
    /// Primary recipients; never empty.
    pub to: Vec<EmailAddress>,
    /// Carbon copy recipients.
    pub cc: Vec<EmailAddress>,
    /// Blind carbon copy recipients.
    pub bcc: Vec<EmailAddress>,
    /// Subject line; empty when the header was absent.
    pub subject: String,
    /// Plain-text body content.
    pub body: String,
    /// Provider-assigned receipt time (processing time when absent).
    pub timestamp: DateTime<Utc>,
    /// Whether the message has been read.
    pub is_read: bool,
    /// Human-facing label names attached to this message.
    pub labels: HashSet<String>,
    /// AI-generated summary, attached lazily.
    pub summary: Option<EmailSummary>,
}

impl Email {
    /// Assembles an email, enforcing the at-least-one-recipient invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EmailId,
        from: EmailAddress,
        to: Vec<EmailAddress>,
        cc: Vec<EmailAddress>,
        subject: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
        is_read: bool,
        labels: HashSet<String>,
    ) -> Result<Self, DomainError> {
        if to.is_empty() {
            return Err(DomainError::NoRecipients);
        }
        Ok(Self {
            id,
            from,
            to,
            cc,
            bcc: Vec::new(),
            subject: subject.into(),
            body: body.into(),
            timestamp,
            is_read,
            labels,
            summary: None,
        })
    }

    /// Returns a copy flagged as read.
    pub fn mark_as_read(self) -> Self {
        Self {
            is_read: true,
            ..self
        }
    }

    /// Returns a copy flagged as unread.
    pub fn mark_as_unread(self) -> Self {
        Self {
            is_read: false,
            ..self
        }
    }

    /// Returns a copy with the label added.
    pub fn add_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Returns a copy with the label removed.
    pub fn remove_label(mut self, label: &str) -> Self {
        self.labels.remove(label);
        self
    }

    /// Returns an archived copy: the inbox label is removed and the archive
    /// label added, whether or not the inbox label was present.
    pub fn archive(mut self) -> Self {
        self.labels.remove(label_names::INBOX);
        self.labels.insert(label_names::ARCHIVE.to_string());
        self
    }

    /// Returns a copy carrying a freshly generated summary.
    pub fn with_summary(self, points: Vec<String>) -> Result<Self, DomainError> {
        let summary = EmailSummary::new(self.id.clone(), points, Utc::now())?;
        Ok(Self {
            summary: Some(summary),
            ..self
        })
    }
}

/// An AI-generated bullet-point summary attached to a single email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSummary {
    /// Identifier of the summarized email.
    pub email_id: EmailId,
    /// Ordered summary points; between 1 and [`MAX_SUMMARY_POINTS`].
    pub points: Vec<String>,
    /// When the summary was generated.
    pub generated_at: DateTime<Utc>,
}

impl EmailSummary {
    /// Creates a summary, rejecting empty and oversized point lists.
    pub fn new(
        email_id: EmailId,
        points: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if points.is_empty() {
            return Err(DomainError::EmptySummary);
        }
        if points.len() > MAX_SUMMARY_POINTS {
            return Err(DomainError::TooManyPoints {
                max: MAX_SUMMARY_POINTS,
                actual: points.len(),
            });
        }
        Ok(Self {
            email_id,
            points,
            generated_at,
        })
    }
}

//! Decoded message to domain entity mapping.

use std::collections::HashSet;

use super::decode::DecodedMessage;
use super::labels::{LabelCatalog, LabelResolver};
use crate::domain::{DomainError, Email};

/// Assembles [`Email`] entities from decoded messages, resolving provider
/// label ids to display names along the way.
pub struct EmailMapper {
    resolver: LabelResolver,
}

impl EmailMapper {
    /// Creates a mapper with a fresh label resolver.
    pub fn new() -> Self {
        Self {
            resolver: LabelResolver::new(),
        }
    }

    /// Creates a mapper around an existing resolver.
    pub fn with_resolver(resolver: LabelResolver) -> Self {
        Self { resolver }
    }

    /// Returns the label resolver, e.g. to invalidate its cache.
    pub fn resolver(&self) -> &LabelResolver {
        &self.resolver
    }

    /// Builds the domain entity for a decoded message.
    ///
    /// Label ids that resolve to no name are dropped from the label set.
    /// Construction only fails on a domain invariant violation (a message
    /// with no recipients), which the caller treats like a decode failure.
    pub async fn map(
        &self,
        catalog: &dyn LabelCatalog,
        decoded: DecodedMessage,
    ) -> Result<Email, DomainError> {
        let mut labels = HashSet::new();
        for id in &decoded.label_ids {
            if let Some(name) = self.resolver.resolve(catalog, id).await {
                labels.insert(name);
            }
        }

        Email::new(
            decoded.id,
            decoded.from,
            decoded.to,
            decoded.cc,
            decoded.subject,
            decoded.body,
            decoded.timestamp,
            decoded.is_read,
            labels,
        )
    }
}

impl Default for EmailMapper {
    fn default() -> Self {
        Self::new()
    }
}

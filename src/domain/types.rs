//! Identifier types for domain entities.
//!
//! Newtype wrappers provide type safety for entity identifiers, preventing
//! accidental mixing of different ID types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// Opaque provider-assigned identifier for an individual email.
///
/// This is the sole correlation key between provider state and local
/// entities. The wrapped string is guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailId(String);

impl EmailId {
    /// Creates an identifier, rejecting empty or whitespace-only input.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::BlankId);
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailId> for String {
    fn from(id: EmailId) -> Self {
        id.0
    }
}

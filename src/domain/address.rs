//! Email address value type.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// Conservative address shape accepted by the client. Deliberately stricter
/// than the RFC grammar; anything odd enough to fail this is treated as
/// undeliverable garbage rather than parsed heroically.
static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid address pattern")
});

/// A single validated mailbox address in `local@domain` form.
///
/// Immutable once constructed; the local part and domain are exposed as
/// derived views over the stored string rather than separate fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and wraps a raw address string.
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::BlankAddress);
        }
        if !ADDRESS_PATTERN.is_match(&value) {
            return Err(DomainError::InvalidAddress(value));
        }
        Ok(Self(value))
    }

    /// Returns the full address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The portion after the `@`.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, domain)| domain).unwrap_or("")
    }

    /// The portion before the `@`.
    pub fn local_part(&self) -> &str {
        self.0
            .split_once('@')
            .map(|(local, _)| local)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(address: EmailAddress) -> Self {
        address.0
    }
}

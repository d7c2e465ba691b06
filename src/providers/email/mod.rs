//! Mailbox provider infrastructure.
//!
//! This module contains the [`Mailbox`] trait and the provider-backed
//! implementation, plus the decoding pipeline that turns provider wire
//! records into domain entities:
//!
//! - [`GmailMailbox`] - Gmail REST API gateway
//! - [`decode`] - transport blob to [`DecodedMessage`]
//! - [`LabelResolver`] / [`LabelCatalog`] - label-id to display-name resolution
//! - [`EmailMapper`] - decoded message to [`crate::domain::Email`]
//!
//! # Architecture
//!
//! The gateway is the only component that talks to the network; decoding and
//! mapping are pure transforms over immutable inputs, so a batch fetch can
//! fan out per-message work with no shared state beyond the label cache.

mod decode;
mod gmail;
mod labels;
mod mapper;
mod traits;

pub use decode::{decode, DecodedMessage, MessageBody, MessagePayload, MessageResource, UNREAD_LABEL_ID};
pub use gmail::GmailMailbox;
pub use labels::{LabelCatalog, LabelResolver};
pub use mapper::EmailMapper;
pub use traits::{Mailbox, ProviderError, Result, StaticToken, TokenSource};

#[cfg(test)]
pub use traits::MockMailbox;

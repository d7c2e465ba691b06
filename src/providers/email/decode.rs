//! Provider message decoding.
//!
//! Turns a fetched provider message record (metadata plus an encoded
//! transport blob) into a structured [`DecodedMessage`], or nothing when the
//! record cannot be decoded. Decoding is all-or-nothing: a record with a
//! missing blob, undecodable base64, an unparseable transport message, or an
//! invalid sender produces no result rather than a partial one.

use base64::prelude::*;
use chrono::{DateTime, Utc};
use mail_parser::{Address, Message, MessageParser, PartType};
use serde::Deserialize;
use std::collections::HashSet;

use crate::domain::{EmailAddress, EmailId};

/// Provider-side label id encoding unread state. Represented on the domain
/// entity as the read flag, never as a label name.
pub const UNREAD_LABEL_ID: &str = "UNREAD";

/// A provider message record as returned by the message endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResource {
    /// Provider-assigned message id.
    pub id: String,
    /// Provider-internal label ids attached to the message.
    pub label_ids: Option<Vec<String>>,
    /// Receipt time in epoch milliseconds, as a string.
    pub internal_date: Option<String>,
    /// Full transport message, base64url-encoded.
    pub raw: Option<String>,
    /// Structured payload carrying the body when `raw` is absent.
    pub payload: Option<MessagePayload>,
}

/// Structured message payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    /// Message body container.
    pub body: Option<MessageBody>,
}

/// Message body data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    /// Base64url-encoded content.
    pub data: Option<String>,
}

/// Structured fields extracted from a provider message.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    /// Provider-assigned identifier.
    pub id: EmailId,
    /// Validated sender address.
    pub from: EmailAddress,
    /// Primary recipients; empty when the header was absent.
    pub to: Vec<EmailAddress>,
    /// Carbon copy recipients.
    pub cc: Vec<EmailAddress>,
    /// Subject line, empty when absent.
    pub subject: String,
    /// Extracted body text.
    pub body: String,
    /// Receipt time, falling back to processing time.
    pub timestamp: DateTime<Utc>,
    /// Raw provider label ids.
    pub label_ids: HashSet<String>,
    /// Derived from the absence of the unread marker.
    pub is_read: bool,
}

/// Decodes a provider message record into structured fields.
///
/// Returns `None` when the record has no transport blob, the blob fails
/// base64url or transport-format parsing, the sender is missing or invalid,
/// or any recipient address fails validation.
pub fn decode(resource: &MessageResource) -> Option<DecodedMessage> {
    let blob = transport_blob(resource)?;
    let message = MessageParser::default().parse(&blob)?;

    let from_raw = message
        .from()
        .and_then(|addr| addr.as_list())
        .and_then(|list| list.first())
        .and_then(|addr| addr.address())?;
    let from = EmailAddress::parse(from_raw).ok()?;

    let to = recipient_list(message.to())?;
    let cc = recipient_list(message.cc())?;

    let subject = message.subject().unwrap_or_default().to_string();
    let body = extract_body(&message);

    let timestamp = resource
        .internal_date
        .as_deref()
        .and_then(|millis| millis.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now);

    let label_ids: HashSet<String> = resource
        .label_ids
        .clone()
        .unwrap_or_default()
        .into_iter()
        .collect();
    let is_read = !label_ids.contains(UNREAD_LABEL_ID);

    let id = EmailId::new(resource.id.clone()).ok()?;

    Some(DecodedMessage {
        id,
        from,
        to,
        cc,
        subject,
        body,
        timestamp,
        label_ids,
        is_read,
    })
}

/// Picks the transport blob out of the record; `raw` wins over the payload.
fn transport_blob(resource: &MessageResource) -> Option<Vec<u8>> {
    let data = resource.raw.as_deref().or_else(|| {
        resource
            .payload
            .as_ref()
            .and_then(|payload| payload.body.as_ref())
            .and_then(|body| body.data.as_deref())
    })?;
    BASE64_URL_SAFE_NO_PAD.decode(data).ok()
}

/// Extracts a recipient list for one recipient type.
///
/// A missing header yields an empty list; a recipient that fails address
/// validation abandons the whole decode (`None`).
fn recipient_list(header: Option<&Address>) -> Option<Vec<EmailAddress>> {
    let Some(list) = header.and_then(|addr| addr.as_list()) else {
        return Some(Vec::new());
    };
    list.iter()
        .filter_map(|addr| addr.address())
        .map(|raw| EmailAddress::parse(raw).ok())
        .collect()
}

/// Applies the body extraction policy.
///
/// A top-level text or HTML part is taken verbatim. For a multipart message
/// the direct children are scanned in declaration order and the first text
/// or HTML part wins; nested multiparts are not descended into. Anything
/// else yields an empty body.
fn extract_body(message: &Message) -> String {
    let Some(root) = message.parts.first() else {
        return String::new();
    };

    match &root.body {
        PartType::Text(text) | PartType::Html(text) => text.to_string(),
        PartType::Multipart(children) => children
            .iter()
            .filter_map(|id| message.parts.get(*id))
            .find_map(|part| match &part.body {
                PartType::Text(text) | PartType::Html(text) => Some(text.to_string()),
                _ => None,
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resource_with_raw(id: &str, raw_message: &str, label_ids: &[&str]) -> MessageResource {
        MessageResource {
            id: id.to_string(),
            label_ids: Some(label_ids.iter().map(|l| l.to_string()).collect()),
            internal_date: Some("1722470400000".to_string()),
            raw: Some(BASE64_URL_SAFE_NO_PAD.encode(raw_message)),
            payload: None,
        }
    }

    #[test]
    fn plain_text_message_decodes() {
        let raw = "From: alice@example.com\r\n\
                   To: bob@example.com, carol@example.com\r\n\
                   Cc: dave@example.com\r\n\
                   Subject: Standup notes\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   Short update: all green.";
        let resource = resource_with_raw("msg-1", raw, &["INBOX", "UNREAD"]);

        let decoded = decode(&resource).expect("decodes");
        assert_eq!(decoded.id.as_str(), "msg-1");
        assert_eq!(decoded.from.as_str(), "alice@example.com");
        assert_eq!(
            decoded
                .to
                .iter()
                .map(|a| a.as_str().to_string())
                .collect::<Vec<_>>(),
            vec!["bob@example.com", "carol@example.com"]
        );
        assert_eq!(decoded.cc.len(), 1);
        assert_eq!(decoded.subject, "Standup notes");
        assert_eq!(decoded.body, "Short update: all green.");
        assert_eq!(
            decoded.timestamp,
            DateTime::from_timestamp_millis(1_722_470_400_000).unwrap()
        );
        assert!(!decoded.is_read);
        assert!(decoded.label_ids.contains("INBOX"));
    }

    #[test]
    fn absent_unread_marker_means_read() {
        let raw = "From: alice@example.com\r\n\
                   To: bob@example.com\r\n\
                   Subject: Old mail\r\n\
                   \r\n\
                   Archived long ago.";
        let resource = resource_with_raw("msg-2", raw, &["INBOX"]);

        let decoded = decode(&resource).expect("decodes");
        assert!(decoded.is_read);
    }

    #[test]
    fn message_without_blob_yields_nothing() {
        let resource = MessageResource {
            id: "msg-3".to_string(),
            label_ids: Some(vec!["INBOX".to_string()]),
            internal_date: None,
            raw: None,
            payload: None,
        };
        assert!(decode(&resource).is_none());
    }

    #[test]
    fn invalid_base64_yields_nothing() {
        let resource = MessageResource {
            id: "msg-4".to_string(),
            label_ids: None,
            internal_date: None,
            raw: Some("%%not-base64%%".to_string()),
            payload: None,
        };
        assert!(decode(&resource).is_none());
    }

    #[test]
    fn malformed_sender_abandons_decode() {
        let raw = "From: not-an-address\r\n\
                   To: bob@example.com\r\n\
                   Subject: Spoofed\r\n\
                   \r\n\
                   Body.";
        let resource = resource_with_raw("msg-5", raw, &[]);
        assert!(decode(&resource).is_none());
    }

    #[test]
    fn missing_sender_abandons_decode() {
        let raw = "To: bob@example.com\r\n\
                   Subject: Anonymous\r\n\
                   \r\n\
                   Body.";
        let resource = resource_with_raw("msg-6", raw, &[]);
        assert!(decode(&resource).is_none());
    }

    #[test]
    fn missing_recipients_yield_empty_list() {
        let raw = "From: alice@example.com\r\n\
                   Subject: Bcc only\r\n\
                   \r\n\
                   Body.";
        let resource = resource_with_raw("msg-7", raw, &[]);

        let decoded = decode(&resource).expect("decodes");
        assert!(decoded.to.is_empty());
        assert!(decoded.cc.is_empty());
    }

    #[test]
    fn multipart_takes_first_eligible_part() {
        // First child is an image, second a nested multipart (not descended
        // into), third the first eligible text part.
        let raw = "From: alice@example.com\r\n\
                   To: bob@example.com\r\n\
                   Subject: Mixed\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                   \r\n\
                   --outer\r\n\
                   Content-Type: image/png\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   iVBORw0KGgo=\r\n\
                   --outer\r\n\
                   Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
                   \r\n\
                   --inner\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   nested text\r\n\
                   --inner--\r\n\
                   --outer\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   third part content\r\n\
                   --outer--\r\n";
        let resource = resource_with_raw("msg-8", raw, &[]);

        let decoded = decode(&resource).expect("decodes");
        assert_eq!(decoded.body.trim_end(), "third part content");
    }

    #[test]
    fn multipart_without_eligible_part_yields_empty_body() {
        let raw = "From: alice@example.com\r\n\
                   To: bob@example.com\r\n\
                   Subject: Attachments only\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                   \r\n\
                   --outer\r\n\
                   Content-Type: application/pdf\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   JVBERi0=\r\n\
                   --outer--\r\n";
        let resource = resource_with_raw("msg-9", raw, &[]);

        let decoded = decode(&resource).expect("decodes");
        assert_eq!(decoded.body, "");
    }

    #[test]
    fn html_body_taken_verbatim() {
        let raw = "From: alice@example.com\r\n\
                   To: bob@example.com\r\n\
                   Subject: Newsletter\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>Hello <b>world</b></p>";
        let resource = resource_with_raw("msg-10", raw, &[]);

        let decoded = decode(&resource).expect("decodes");
        assert_eq!(decoded.body, "<p>Hello <b>world</b></p>");
    }

    #[test]
    fn payload_data_used_when_raw_absent() {
        let raw = "From: alice@example.com\r\n\
                   To: bob@example.com\r\n\
                   Subject: Via payload\r\n\
                   \r\n\
                   Payload body.";
        let resource = MessageResource {
            id: "msg-11".to_string(),
            label_ids: None,
            internal_date: None,
            raw: None,
            payload: Some(MessagePayload {
                body: Some(MessageBody {
                    data: Some(BASE64_URL_SAFE_NO_PAD.encode(raw)),
                }),
            }),
        };

        let decoded = decode(&resource).expect("decodes");
        assert_eq!(decoded.subject, "Via payload");
        assert_eq!(decoded.body, "Payload body.");
    }

    #[test]
    fn missing_internal_date_falls_back_to_now() {
        let raw = "From: alice@example.com\r\n\
                   To: bob@example.com\r\n\
                   Subject: No date\r\n\
                   \r\n\
                   Body.";
        let mut resource = resource_with_raw("msg-12", raw, &[]);
        resource.internal_date = None;

        let before = Utc::now();
        let decoded = decode(&resource).expect("decodes");
        assert!(decoded.timestamp >= before);
    }

    #[test]
    fn invalid_recipient_abandons_decode() {
        let raw = "From: alice@example.com\r\n\
                   To: bob@localhost\r\n\
                   Subject: Intranet\r\n\
                   \r\n\
                   Body.";
        let resource = resource_with_raw("msg-13", raw, &[]);
        assert!(decode(&resource).is_none());
    }
}

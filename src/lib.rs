//! breve - an AI-summarizing personal email client core
//!
//! This crate implements the mail ingestion and summarization pipeline:
//! fetching messages from the remote mailbox provider, decoding them into
//! validated domain entities, and enriching them with bounded bullet-point
//! summaries from a text-generation backend. HTTP routing, UI rendering,
//! and credential acquisition are external collaborators.

pub mod config;
pub mod domain;
pub mod providers;
pub mod services;

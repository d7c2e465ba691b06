//! breve - entry point for the summary demo CLI
//!
//! Wires the pipeline end to end: fetches unread mail through the Gmail
//! gateway and prints each message with its generated summary. The access
//! token is expected in `GMAIL_ACCESS_TOKEN`; acquiring it is out of scope
//! here.

use std::sync::Arc;

use anyhow::Context;

use breve::config::Settings;
use breve::providers::ai::OllamaGenerator;
use breve::providers::email::{GmailMailbox, StaticToken};
use breve::services::{EmailService, SummaryService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut settings = Settings::load_or_default();
    if let Ok(url) = std::env::var("BREVE_OLLAMA_URL") {
        settings.ai.base_url = url;
    }
    if let Ok(model) = std::env::var("BREVE_OLLAMA_MODEL") {
        settings.ai.model = model;
    }

    let token = std::env::var("GMAIL_ACCESS_TOKEN")
        .context("GMAIL_ACCESS_TOKEN must be set to a valid access token")?;

    let mailbox = Arc::new(
        GmailMailbox::new(Arc::new(StaticToken::new(token)))
            .with_page_size(settings.mailbox.page_size),
    );

    let generator = Arc::new(OllamaGenerator::with_url(
        settings.ai.base_url.clone(),
        settings.ai.model.clone(),
    ));
    let mut summaries = SummaryService::new(generator);
    if let Some(temperature) = settings.ai.temperature {
        summaries = summaries.with_temperature(temperature);
    }
    if let Some(max_tokens) = settings.ai.max_tokens {
        summaries = summaries.with_max_tokens(max_tokens);
    }

    let service = EmailService::new(mailbox, summaries);

    tracing::info!(model = %settings.ai.model, "fetching unread mail");
    let emails = service.fetch(true).await?;

    for email in &emails {
        println!("{}  {}  {}", email.timestamp, email.from, email.subject);
        if let Some(summary) = &email.summary {
            for point in &summary.points {
                println!("  \u{2022} {}", point);
            }
        }
        println!();
    }

    tracing::info!(count = emails.len(), "done");
    Ok(())
}

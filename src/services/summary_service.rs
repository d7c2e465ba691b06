//! Email summarization service.
//!
//! Builds the summarization prompt for an email, sends it to the configured
//! text-generation backend, and normalizes the free-text response into
//! exactly ten display-ready points.

use std::sync::Arc;

use crate::domain::{Email, EmailAddress, MAX_SUMMARY_POINTS};
use crate::providers::ai::{CompletionRequest, LlmResult, TextGenerator};

/// Service producing bullet-point summaries for emails.
pub struct SummaryService {
    generator: Arc<dyn TextGenerator>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
}

impl SummaryService {
    /// Creates a service with backend-default sampling options.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the sampling temperature used for summary generation.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the generation token cap.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Produces exactly [`MAX_SUMMARY_POINTS`] summary points for the email.
    ///
    /// The backend is asked for exactly ten bullets, but that instruction is
    /// best-effort: overlong responses are truncated and short ones padded,
    /// so the returned list always has exactly ten entries. Backend errors
    /// propagate; the email being summarized is never touched on failure.
    pub async fn generate(&self, email: &Email) -> LlmResult<Vec<String>> {
        let mut request = CompletionRequest::new(build_prompt(email));
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        let response = self.generator.complete(&request).await?;
        Ok(normalize_points(&response.text))
    }
}

/// Builds the fixed-shape summarization prompt.
fn build_prompt(email: &Email) -> String {
    let mut content = String::new();
    content.push_str(&format!("From: {}\n", email.from));
    content.push_str(&format!("To: {}\n", join_addresses(&email.to)));
    if !email.cc.is_empty() {
        content.push_str(&format!("CC: {}\n", join_addresses(&email.cc)));
    }
    content.push_str(&format!("Subject: {}\n", email.subject));
    content.push('\n');
    content.push_str(&email.body);

    format!(
        "Summarize the following email content in exactly 10 bullet points.\n\
         Each bullet point should be concise and capture a key aspect of the email.\n\
         Format each bullet point on a new line starting with \"\u{2022} \".\n\
         \n\
         Email content:\n\
         {content}"
    )
}

fn join_addresses(addresses: &[EmailAddress]) -> String {
    addresses
        .iter()
        .map(EmailAddress::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalizes a free-text backend response into exactly ten points.
///
/// Only lines starting with a bullet marker or hyphen qualify; the marker
/// and surrounding whitespace are stripped and blank remainders dropped.
/// The first ten qualifying lines are kept; short results are padded with
/// placeholder points.
fn normalize_points(response: &str) -> Vec<String> {
    let mut points: Vec<String> = response
        .lines()
        .filter(|line| line.starts_with('\u{2022}') || line.starts_with('-'))
        .map(|line| {
            let stripped = line.strip_prefix('\u{2022}').unwrap_or(line);
            let stripped = stripped.strip_prefix('-').unwrap_or(stripped);
            stripped.trim().to_string()
        })
        .filter(|point| !point.is_empty())
        .take(MAX_SUMMARY_POINTS)
        .collect();

    if points.len() < MAX_SUMMARY_POINTS {
        let missing = MAX_SUMMARY_POINTS - points.len();
        // TODO: replace the placeholder text once product decides what short
        // summaries should display; clients currently render these verbatim.
        tracing::warn!(missing, "backend returned a short summary, padding with placeholders");
        for n in 1..=missing {
            points.push(format!("Additional context point {}", n));
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, EmailId};
    use crate::providers::ai::{CompletionResponse, MockTextGenerator};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn sample_email(cc: Vec<&str>) -> Email {
        Email::new(
            EmailId::new("msg-1").unwrap(),
            EmailAddress::parse("alice@example.com").unwrap(),
            vec![EmailAddress::parse("bob@example.com").unwrap()],
            cc.into_iter()
                .map(|a| EmailAddress::parse(a).unwrap())
                .collect(),
            "Project kickoff",
            "We start Monday. Agenda attached.",
            Utc::now(),
            false,
            Default::default(),
        )
        .unwrap()
    }

    #[test]
    fn thirteen_bullets_truncate_to_first_ten() {
        let response: String = (1..=13).map(|i| format!("\u{2022} Point {}\n", i)).collect();
        let points = normalize_points(&response);

        assert_eq!(points.len(), 10);
        assert_eq!(points[0], "Point 1");
        assert_eq!(points[9], "Point 10");
    }

    #[test]
    fn four_bullets_padded_to_ten() {
        let response = "\u{2022} One\n\u{2022} Two\n- Three\n- Four\n";
        let points = normalize_points(response);

        assert_eq!(points.len(), 10);
        assert_eq!(
            points[..4].to_vec(),
            vec!["One", "Two", "Three", "Four"]
        );
        assert_eq!(points[4], "Additional context point 1");
        assert_eq!(points[9], "Additional context point 6");
    }

    #[test]
    fn non_bullet_lines_are_ignored() {
        let response = "Here is your summary:\n\
                        \u{2022} Real point\n\
                        Some commentary in between.\n\
                        - Another point\n";
        let points = normalize_points(response);

        assert_eq!(points[0], "Real point");
        assert_eq!(points[1], "Another point");
        assert_eq!(points[2], "Additional context point 1");
    }

    #[test]
    fn blank_bullets_are_dropped() {
        let response = "\u{2022} \n\u{2022} Kept\n-\n";
        let points = normalize_points(response);

        assert_eq!(points[0], "Kept");
        assert_eq!(points[1], "Additional context point 1");
    }

    #[tokio::test]
    async fn prompt_embeds_headers_and_body() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_complete()
            .withf(|request: &CompletionRequest| {
                request.prompt.contains("From: alice@example.com")
                    && request.prompt.contains("To: bob@example.com")
                    && request.prompt.contains("Subject: Project kickoff")
                    && request.prompt.contains("We start Monday.")
                    && request.prompt.contains("exactly 10 bullet points")
            })
            .returning(|_| {
                Ok(CompletionResponse {
                    text: "\u{2022} summary".to_string(),
                })
            });

        let service = SummaryService::new(Arc::new(generator));
        let points = service.generate(&sample_email(vec![])).await.unwrap();
        assert_eq!(points.len(), 10);
    }

    #[tokio::test]
    async fn prompt_omits_cc_when_empty() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_complete()
            .withf(|request: &CompletionRequest| !request.prompt.contains("CC:"))
            .returning(|_| {
                Ok(CompletionResponse {
                    text: "\u{2022} summary".to_string(),
                })
            });

        let service = SummaryService::new(Arc::new(generator));
        service.generate(&sample_email(vec![])).await.unwrap();
    }

    #[tokio::test]
    async fn prompt_includes_cc_when_present() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_complete()
            .withf(|request: &CompletionRequest| request.prompt.contains("CC: carol@example.com"))
            .returning(|_| {
                Ok(CompletionResponse {
                    text: "\u{2022} summary".to_string(),
                })
            });

        let service = SummaryService::new(Arc::new(generator));
        service
            .generate(&sample_email(vec!["carol@example.com"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sampling_options_forwarded() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_complete()
            .withf(|request: &CompletionRequest| {
                request.temperature == Some(0.2) && request.max_tokens == Some(400)
            })
            .returning(|_| {
                Ok(CompletionResponse {
                    text: "\u{2022} summary".to_string(),
                })
            });

        let service = SummaryService::new(Arc::new(generator))
            .with_temperature(0.2)
            .with_max_tokens(400);
        service.generate(&sample_email(vec![])).await.unwrap();
    }
}

//! Business services layer.
//!
//! Services sit between the transport layer and the infrastructure layer:
//!
//! ```text
//! HTTP / UI layer (external collaborators)
//!          |
//!          v
//!    Services layer  <-- You are here
//!          |
//!          v
//! Infrastructure (mailbox gateway, text-generation backend)
//! ```
//!
//! # Services Overview
//!
//! - [`EmailService`]: fetch/mutate use cases over the mailbox gateway,
//!   with lazy summary enrichment
//! - [`SummaryService`]: prompt construction and summary normalization over
//!   the text-generation backend

mod email_service;
mod summary_service;

pub use email_service::{EmailService, ServiceError, DEFAULT_FETCH_LIMIT};
pub use summary_service::SummaryService;

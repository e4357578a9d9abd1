//! graphmail - resilient Graph mailbox attachment workflow
//!
//! This crate provides the core of the pelican downloader:
//! - Single-shot password-grant authentication against the identity provider
//! - Mailbox search over the Graph REST API (first page, verbatim KQL query)
//! - Per-message attachment download with abort-on-first-failure semantics
//! - An operator notifier (one SMTP transaction per notification)
//! - A log-then-notify-then-propagate wrapper applied to every operation
//!
//! Strictly sequential and synchronous: no retries, no pagination, no token
//! refresh. Every failure aborts its enclosing unit of work and propagates.

pub mod config;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod models;
pub mod notify;
pub mod report;

pub use config::{GraphSettings, SmtpSettings};
pub use error::GraphError;
pub use fetch::download_attachments;
pub use graph::{Credentials, GraphSession};
pub use models::{AttachmentDescriptor, MessageId, MessageSummary};
pub use notify::{Notifier, SmtpNotifier};
pub use report::report_outcome;

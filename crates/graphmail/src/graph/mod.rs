//! Microsoft Graph integration
//!
//! This module provides:
//! - Resource-owner-password token acquisition
//! - An authenticated session for mailbox search and attachment endpoints

mod auth;
mod client;

pub use auth::Credentials;
pub use client::GraphSession;

/// Graph API response types
///
/// Only the fields the workflow projects are modeled. A 2xx response that
/// does not match these shapes is a decode failure, by contract.
pub mod api {
    use serde::Deserialize;

    /// Response from listing or searching messages
    #[derive(Debug, Deserialize)]
    pub struct ListMessagesResponse {
        pub value: Vec<GraphMessage>,
    }

    /// One message entry in a search response
    #[derive(Debug, Deserialize)]
    pub struct GraphMessage {
        pub id: String,
        pub subject: String,
        pub from: Sender,
    }

    /// Sender envelope (`from.emailAddress.address`)
    #[derive(Debug, Deserialize)]
    pub struct Sender {
        #[serde(rename = "emailAddress")]
        pub email_address: EmailAddress,
    }

    #[derive(Debug, Deserialize)]
    pub struct EmailAddress {
        pub address: String,
    }

    /// Response from listing a message's attachments
    #[derive(Debug, Deserialize)]
    pub struct ListAttachmentsResponse {
        pub value: Vec<AttachmentEntry>,
    }

    /// One attachment entry (metadata only; content comes from `$value`)
    #[derive(Debug, Deserialize)]
    pub struct AttachmentEntry {
        pub id: String,
        pub name: String,
    }
}

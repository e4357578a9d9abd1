//! Authenticated Graph API session
//!
//! Holds the bearer token acquired at construction and exposes the mailbox
//! search and attachment endpoints. Uses synchronous HTTP (ureq); every call
//! is a blocking round trip with the transport's default timeouts.

use log::info;
use serde::de::DeserializeOwned;
use ureq::Agent;

use super::api;
use super::auth::{self, Credentials};
use crate::error::GraphError;
use crate::models::{AttachmentDescriptor, MessageId, MessageSummary};

/// Upper bound when reading attachment content. Graph caps attachment sizes
/// far below this; the limit only bounds the body reader.
const MAX_ATTACHMENT_BYTES: u64 = 512 * 1024 * 1024;

/// Authenticated session against the Graph mail API.
///
/// Read-only after construction: the token is acquired exactly once and is
/// invalidated only by process restart.
pub struct GraphSession {
    agent: Agent,
    endpoint: String,
    access_token: String,
}

impl GraphSession {
    /// Graph API base URL
    pub const DEFAULT_ENDPOINT: &'static str = "https://graph.microsoft.com/v1.0";

    /// Authority base; the tenant ID is appended to form the token authority
    pub const DEFAULT_AUTHORITY_BASE: &'static str = "https://login.microsoftonline.com";

    /// Default scope for the password grant
    pub const DEFAULT_SCOPE: &'static str = "https://graph.microsoft.com/.default";

    /// Authenticate once via the password grant and build a session.
    ///
    /// Fails with [`GraphError::Authentication`] when the provider response
    /// carries no access token; the caller must not proceed to search or
    /// download in that case.
    pub fn connect(
        credentials: &Credentials,
        authority: &str,
        endpoint: &str,
        scopes: &[String],
    ) -> Result<Self, GraphError> {
        // Non-2xx statuses must surface with their body, not as transport
        // errors: ApiRequest carries both.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        let access_token = auth::acquire_token(&agent, credentials, authority, scopes)?;

        Ok(Self {
            agent,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Search the mailbox for messages.
    ///
    /// `search_query` is a provider-specific expression taken verbatim (KQL,
    /// e.g. `?$search="..."`); its values are percent-encoded on the way out
    /// so the quotes and spaces KQL carries survive the URI grammar. `None`
    /// returns the provider's default page. Only the first page is consumed —
    /// pagination is deliberately not followed.
    pub fn search_messages(
        &self,
        search_query: Option<&str>,
    ) -> Result<Vec<MessageSummary>, GraphError> {
        let url = format!(
            "{}/me/messages{}",
            self.endpoint,
            search_query.map(encode_search_query).unwrap_or_default()
        );

        let list: api::ListMessagesResponse = self.get_json(&url)?;

        let messages: Vec<MessageSummary> = list
            .value
            .into_iter()
            .map(|m| MessageSummary {
                id: MessageId::new(m.id),
                subject: m.subject,
                from: m.from.email_address.address,
            })
            .collect();

        info!("{} messages have been found: {:?}", messages.len(), messages);
        Ok(messages)
    }

    /// List the attachment descriptors of a message, in response order.
    pub fn list_attachments(
        &self,
        message_id: &MessageId,
    ) -> Result<Vec<AttachmentDescriptor>, GraphError> {
        let url = format!(
            "{}/me/messages/{}/attachments",
            self.endpoint,
            message_id.as_str()
        );

        let list: api::ListAttachmentsResponse = self.get_json(&url)?;

        Ok(list
            .value
            .into_iter()
            .map(|a| AttachmentDescriptor {
                id: a.id,
                name: a.name,
            })
            .collect())
    }

    /// Fetch one attachment's raw bytes via the `$value` sub-resource.
    pub fn fetch_attachment_content(
        &self,
        message_id: &MessageId,
        attachment_id: &str,
    ) -> Result<Vec<u8>, GraphError> {
        let url = format!(
            "{}/me/messages/{}/attachments/{}/$value",
            self.endpoint,
            message_id.as_str(),
            attachment_id
        );

        let mut response = self.get(&url)?;
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_ATTACHMENT_BYTES)
            .read_to_vec()?;
        Ok(bytes)
    }

    /// Authenticated GET. Non-2xx statuses become [`GraphError::ApiRequest`]
    /// with the raw response body.
    fn get(&self, url: &str) -> Result<ureq::http::Response<ureq::Body>, GraphError> {
        let mut response = self
            .agent
            .get(url)
            .header("Authorization", &format!("Bearer {}", self.access_token))
            .call()?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body still yields ApiRequest with the status.
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(GraphError::ApiRequest {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GraphError> {
        let mut response = self.get(url)?;
        let raw = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Percent-encode a search expression's values while preserving its
/// `?key=value&` structure. KQL carries quotes, colons and spaces, which the
/// URI grammar rejects; the provider sees the expression unchanged once the
/// transport decodes it.
fn encode_search_query(query: &str) -> String {
    let Some(params) = query.strip_prefix('?') else {
        return urlencoding::encode(query).into_owned();
    };

    let encoded = params
        .split('&')
        .map(|param| match param.split_once('=') {
            Some((key, value)) => format!("{}={}", key, urlencoding::encode(value)),
            None => urlencoding::encode(param).into_owned(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("?{}", encoded)
}

//! Domain models for mailbox search results and attachments

use serde::{Deserialize, Serialize};

/// Unique identifier for a message (opaque Graph message ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Projection of a found message: id, subject and the sender's address.
/// Produced by the search operation in API response order; valid only for
/// the run that produced it (ids are never cached across runs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: MessageId,
    pub subject: String,
    pub from: String,
}

/// Provider metadata for one attachment: id plus the name used verbatim as
/// the destination file name. Lives only for the duration of a fetch call.
#[derive(Debug, Clone)]
pub struct AttachmentDescriptor {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_from_str() {
        let id = MessageId::from("AAMkAGI2");
        assert_eq!(id.as_str(), "AAMkAGI2");
    }

    #[test]
    fn test_message_summary_serializes_plain_fields() {
        let summary = MessageSummary {
            id: MessageId::new("m1"),
            subject: "Invoice".to_string(),
            from: "billing@example.com".to_string(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""subject":"Invoice""#));
        assert!(json.contains(r#""from":"billing@example.com""#));
    }
}

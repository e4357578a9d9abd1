//! Per-message attachment download
//!
//! Enumerates a message's attachments and persists each one into the
//! destination directory, strictly in enumeration order. The first failing
//! attachment aborts the remainder of that message.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::GraphError;
use crate::graph::GraphSession;
use crate::models::{AttachmentDescriptor, MessageId};

/// Download every attachment of `message_id` into `save_dir`.
///
/// Attachment names are used verbatim as file names, overwriting existing
/// files. No sanitization is applied — a name carrying path separators is
/// written where it points, so the destination directory must only receive
/// trusted mail (open risk, tracked in DESIGN.md).
///
/// Returns the number of attachments the provider enumerated. A message
/// without attachments returns 0 and writes nothing. If any single fetch or
/// write fails, the error names the failing attachment and the remaining
/// attachments are never attempted.
pub fn download_attachments(
    session: &GraphSession,
    message_id: &MessageId,
    save_dir: &Path,
) -> Result<usize, GraphError> {
    let attachments = session.list_attachments(message_id)?;

    for attachment in &attachments {
        save_one(session, message_id, attachment, save_dir).map_err(|err| {
            GraphError::Attachment {
                id: attachment.id.clone(),
                name: attachment.name.clone(),
                source: Box::new(err),
            }
        })?;
    }

    Ok(attachments.len())
}

fn save_one(
    session: &GraphSession,
    message_id: &MessageId,
    attachment: &AttachmentDescriptor,
    save_dir: &Path,
) -> Result<(), GraphError> {
    let content = session.fetch_attachment_content(message_id, &attachment.id)?;

    let path = save_dir.join(&attachment.name);
    fs::write(&path, &content).map_err(|source| GraphError::Filesystem {
        path: path.clone(),
        source,
    })?;

    info!("{} has been saved successfully", attachment.name);
    Ok(())
}

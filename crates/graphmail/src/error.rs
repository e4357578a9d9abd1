//! Error taxonomy for the Graph mail workflow
//!
//! Every external operation resolves to one of these variants. Nothing is
//! recovered locally: a failure aborts its enclosing unit of work and
//! propagates to the caller.

use std::io;
use std::path::PathBuf;

/// Errors raised by the Graph session, attachment fetcher and notifier
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The token endpoint answered but the response carried no access token
    /// (bad credentials, MFA challenge, expired password, disabled app
    /// registration). Fatal — nothing else may run without a token.
    #[error("token response carried no access token:\n{response}")]
    Authentication { response: String },

    /// The mail provider returned a non-success HTTP status.
    #[error("provider returned HTTP {status}:\n{body}")]
    ApiRequest { status: u16, body: String },

    /// The request never got a usable HTTP response.
    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The provider answered 2xx but the body did not have the expected shape.
    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A single attachment's fetch or write failed. Carries the attachment's
    /// id and name so the operator notification can point at it.
    #[error("attachment {name} (id: {id}) failed")]
    Attachment {
        id: String,
        name: String,
        #[source]
        source: Box<GraphError>,
    },

    /// The SMTP notification transaction failed. Terminal: never wrapped in
    /// a further reporting layer.
    #[error("notification delivery failed: {message}")]
    Notification { message: String },

    /// Writing an attachment to the destination directory failed.
    #[error("failed to write {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GraphError {
    /// Render the error and its full cause chain, one cause per line.
    /// Used for log records and notification bodies, where the raw HTTP
    /// response text buried in a chained variant still matters.
    pub fn chain(&self) -> String {
        use std::error::Error;

        let mut out = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            out.push_str(&format!("\ncaused by: {}", err));
            cause = err.source();
        }
        out
    }
}

//! Resource-owner-password token acquisition
//!
//! Exchanges a username/password pair directly for a bearer token against
//! the tenant's token endpoint. Single-shot: no refresh, no expiry tracking.
//! The grant does not work for accounts with interactive MFA requirements —
//! a known limitation of the flow, not handled here.

use log::info;

use crate::error::GraphError;

/// Credentials for the mailbox principal. Immutable, used exactly once.
#[derive(Clone)]
pub struct Credentials {
    /// App registration (client) ID
    pub client_id: String,
    /// Principal whose mailbox is read
    pub username: String,
    /// Principal's password
    pub password: String,
}

// Manual Debug: the password must never end up in a log record.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Acquire a bearer token via the password grant.
///
/// The provider reports grant failures in the response body rather than the
/// status line, so the body is inspected for an `access_token` member
/// regardless of status. A response without one fails with
/// [`GraphError::Authentication`] carrying the raw provider response.
pub(crate) fn acquire_token(
    agent: &ureq::Agent,
    credentials: &Credentials,
    authority: &str,
    scopes: &[String],
) -> Result<String, GraphError> {
    let url = format!("{}/oauth2/v2.0/token", authority.trim_end_matches('/'));
    let scope = scopes.join(" ");

    let mut response = agent.post(&url).send_form([
        ("client_id", credentials.client_id.as_str()),
        ("grant_type", "password"),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
        ("scope", scope.as_str()),
    ])?;

    let raw = response.body_mut().read_to_string()?;

    let token = serde_json::from_str::<serde_json::Value>(&raw)
        .ok()
        .and_then(|v| v.get("access_token")?.as_str().map(str::to_owned));

    match token {
        Some(access_token) => {
            info!("Token has been successfully acquired");
            Ok(access_token)
        }
        None => Err(GraphError::Authentication { response: raw }),
    }
}

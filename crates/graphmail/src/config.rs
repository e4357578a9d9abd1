//! Typed settings for the download run
//!
//! Two JSON files drive a run: the Graph settings (app registration, tenant
//! and mailbox principal) and the SMTP settings used for operator
//! notifications. Both are consumed once at startup; a missing key is a
//! fatal startup error.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::graph::{Credentials, GraphSession};

/// Graph settings filename looked up when no explicit path is given
pub const GRAPH_SETTINGS_FILE: &str = "main_config.json";

/// SMTP settings filename looked up when no explicit path is given
pub const SMTP_SETTINGS_FILE: &str = "mail_config.json";

/// Settings for token acquisition and mailbox access
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    pub client_id: String,
    pub tenant_id: String,
    pub user_to_read: String,
    pub user_password: String,
    /// Fallback destination directory when the CLI does not pass one
    #[serde(default)]
    pub save_path: Option<String>,
}

impl GraphSettings {
    /// Load from the working directory or the shared config directory.
    pub fn load() -> Result<Self> {
        Self::from_file(&config::resolve(GRAPH_SETTINGS_FILE))
    }

    /// Load from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Token authority for this tenant
    pub fn authority(&self) -> String {
        format!(
            "{}/{}",
            GraphSession::DEFAULT_AUTHORITY_BASE,
            self.tenant_id
        )
    }

    /// Credentials view used exactly once, at session construction
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            username: self.user_to_read.clone(),
            password: self.user_password.clone(),
        }
    }
}

/// Settings for the SMTP notification boundary
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub sender_username: String,
    pub sender_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub receiver_address: Vec<String>,
}

impl SmtpSettings {
    /// Load from the working directory or the shared config directory.
    pub fn load() -> Result<Self> {
        Self::from_file(&config::resolve(SMTP_SETTINGS_FILE))
    }

    /// Load from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }
}

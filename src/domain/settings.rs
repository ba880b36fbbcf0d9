use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outbound email configuration; a single row per installation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub reply_to: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateEmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub reply_to: Option<String>,
}

impl UpdateEmailSettings {
    #[must_use]
    pub fn new(
        smtp_host: String,
        smtp_port: u16,
        sender: String,
        reply_to: Option<String>,
    ) -> Self {
        Self {
            smtp_host: smtp_host.trim().to_string(),
            smtp_port,
            sender: sender.to_lowercase().trim().to_string(),
            reply_to: reply_to
                .map(|s| s.to_lowercase().trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

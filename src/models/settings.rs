use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::settings::{
    EmailSettings as DomainEmailSettings, UpdateEmailSettings as DomainUpdateEmailSettings,
};

/// Primary key of the single email settings row.
pub const EMAIL_SETTINGS_ROW: i32 = 1;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::email_settings)]
pub struct EmailSettings {
    pub id: i32,
    pub smtp_host: String,
    pub smtp_port: i32,
    pub sender: String,
    pub reply_to: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::email_settings)]
pub struct UpsertEmailSettings<'a> {
    pub id: i32,
    pub smtp_host: &'a str,
    pub smtp_port: i32,
    pub sender: &'a str,
    pub reply_to: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<EmailSettings> for DomainEmailSettings {
    fn from(settings: EmailSettings) -> Self {
        Self {
            smtp_host: settings.smtp_host,
            smtp_port: settings.smtp_port as u16,
            sender: settings.sender,
            reply_to: settings.reply_to,
            updated_at: settings.updated_at,
        }
    }
}

impl<'a> UpsertEmailSettings<'a> {
    pub fn new(update: &'a DomainUpdateEmailSettings, updated_at: NaiveDateTime) -> Self {
        Self {
            id: EMAIL_SETTINGS_ROW,
            smtp_host: update.smtp_host.as_str(),
            smtp_port: i32::from(update.smtp_port),
            sender: update.sender.as_str(),
            reply_to: update.reply_to.as_deref(),
            updated_at,
        }
    }
}

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::settings::{EmailSettings, UpdateEmailSettings};
use crate::models::settings::{
    EMAIL_SETTINGS_ROW, EmailSettings as DbEmailSettings, UpsertEmailSettings,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SettingsReader, SettingsWriter};

impl SettingsReader for DieselRepository {
    fn email_settings(&self) -> RepositoryResult<Option<EmailSettings>> {
        use crate::schema::email_settings;

        let mut conn = self.conn()?;
        let settings = email_settings::table
            .find(EMAIL_SETTINGS_ROW)
            .first::<DbEmailSettings>(&mut conn)
            .optional()?;

        Ok(settings.map(Into::into))
    }
}

impl SettingsWriter for DieselRepository {
    fn save_email_settings(&self, update: &UpdateEmailSettings) -> RepositoryResult<EmailSettings> {
        use crate::schema::email_settings;

        let mut conn = self.conn()?;
        let upsert = UpsertEmailSettings::new(update, Utc::now().naive_utc());

        diesel::replace_into(email_settings::table)
            .values(&upsert)
            .execute(&mut conn)?;

        let saved = email_settings::table
            .find(EMAIL_SETTINGS_ROW)
            .first::<DbEmailSettings>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(saved.into())
    }
}

use serde::Deserialize;
use validator::Validate;

use crate::domain::settings::UpdateEmailSettings;

#[derive(Deserialize, Validate)]
pub struct EmailSettingsForm {
    #[validate(length(min = 1))]
    pub smtp_host: String,
    pub smtp_port: u16,
    #[validate(email)]
    pub sender: String,
    pub reply_to: Option<String>,
}

impl From<EmailSettingsForm> for UpdateEmailSettings {
    fn from(form: EmailSettingsForm) -> Self {
        UpdateEmailSettings::new(form.smtp_host, form.smtp_port, form.sender, form.reply_to)
    }
}

#[derive(Deserialize, Validate)]
pub struct ChangePasswordForm {
    pub current_password: String,
    #[validate(length(min = 12))]
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct TwoFactorForm {
    /// Checkbox value; present ("on") when the box is ticked.
    pub enabled: Option<String>,
}

impl TwoFactorForm {
    pub fn is_enabled(&self) -> bool {
        self.enabled.as_deref() == Some("on")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_form_normalizes_into_update() {
        let form = EmailSettingsForm {
            smtp_host: " smtp.example.com ".to_string(),
            smtp_port: 587,
            sender: "Console@Example.com".to_string(),
            reply_to: Some("".to_string()),
        };

        let update: UpdateEmailSettings = form.into();
        assert_eq!(update.smtp_host, "smtp.example.com");
        assert_eq!(update.sender, "console@example.com");
        assert_eq!(update.reply_to, None);
    }

    #[test]
    fn two_factor_checkbox_maps_to_bool() {
        assert!(
            TwoFactorForm {
                enabled: Some("on".to_string())
            }
            .is_enabled()
        );
        assert!(!TwoFactorForm { enabled: None }.is_enabled());
    }
}

use crate::domain::settings::EmailSettings;
use crate::domain::user::User;

/// Aggregated data required to render the settings page: the installation's
/// email configuration plus the signed-in user's security state.
pub struct SettingsPageData {
    pub email: Option<EmailSettings>,
    pub account: Option<User>,
}

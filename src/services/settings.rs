//! Settings services: email configuration, password change, and two-factor
//! enrollment for the signed-in account.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use rand::RngExt;
use rand::distr::Alphanumeric;
use serde_json::json;
use validator::Validate;

use crate::domain::audit_event::AuditEventType;
use crate::domain::settings::{EmailSettings, UpdateEmailSettings};
use crate::domain::types::{EmailAddress, UserId};
use crate::domain::user::User;
use crate::dto::settings::SettingsPageData;
use crate::forms::FormError;
use crate::forms::settings::{ChangePasswordForm, EmailSettingsForm, TwoFactorForm};
use crate::models::auth::{AuthenticatedUser, check_role};
use crate::repository::{AuditEventWriter, SettingsReader, SettingsWriter, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, audit, hash_password};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads the settings page: installation email configuration plus the
/// signed-in user's account state.
pub fn load_settings_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SettingsPageData>
where
    R: SettingsReader + UserReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let email = repo.email_settings().map_err(|err| {
        log::error!("Failed to load email settings: {err}");
        err
    })?;

    let account = match EmailAddress::new(user.email.clone()) {
        Ok(address) => repo.get_user_by_email(&address)?,
        Err(_) => None,
    };

    Ok(SettingsPageData { email, account })
}

/// Validates and persists the installation's email settings.
pub fn save_email_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EmailSettingsForm,
) -> ServiceResult<EmailSettings>
where
    R: SettingsWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    if let Err(err) = form.validate() {
        log::error!("Failed to validate email settings form: {err}");
        return Err(ServiceError::Form("Invalid email settings".to_string()));
    }

    let update: UpdateEmailSettings = form.into();
    let saved = repo.save_email_settings(&update).map_err(|err| {
        log::error!("Failed to save email settings: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::EmailSettingsSaved,
        json!({"smtp_host": saved.smtp_host, "smtp_port": saved.smtp_port}),
    )?;

    Ok(saved)
}

/// Changes the signed-in user's password after verifying the current one.
pub fn change_password<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ChangePasswordForm,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    if let Err(err) = form.validate() {
        log::error!("Failed to validate password form: {err}");
        return Err(ServiceError::Form("Invalid password form".to_string()));
    }

    if form.new_password != form.confirm_password {
        return Err(ServiceError::Form(FormError::PasswordMismatch.to_string()));
    }

    let account = current_account(repo, user)?;
    let id = UserId::new(account.id)?;

    let stored = repo
        .user_password_hash(id)?
        .ok_or(ServiceError::NotFound)?;
    let parsed = PasswordHash::new(&stored)
        .map_err(|err| ServiceError::Internal(format!("Corrupt password hash: {err}")))?;

    if Argon2::default()
        .verify_password(form.current_password.as_bytes(), &parsed)
        .is_err()
    {
        return Err(ServiceError::Form(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash_password(&form.new_password)?;
    repo.set_user_password(id, &new_hash).map_err(|err| {
        log::error!("Failed to set password for user {id}: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::PasswordChanged,
        json!({"user_id": account.id}),
    )?;

    Ok(())
}

/// Enables or disables two-factor authentication for the signed-in user.
/// Enabling generates a fresh secret; disabling clears it.
pub fn set_two_factor<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &TwoFactorForm,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let account = current_account(repo, user)?;
    let id = UserId::new(account.id)?;

    let (updated, event_type) = if form.is_enabled() {
        let secret: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        (
            repo.set_user_two_factor(id, true, Some(secret))?,
            AuditEventType::TwoFactorEnabled,
        )
    } else {
        (
            repo.set_user_two_factor(id, false, None)?,
            AuditEventType::TwoFactorDisabled,
        )
    };

    audit::record_event(repo, &user.email, event_type, json!({"user_id": account.id}))?;

    Ok(updated)
}

fn current_account<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let address = EmailAddress::new(user.email.clone())?;
    repo.get_user_by_email(&address)?
        .ok_or(ServiceError::NotFound)
}

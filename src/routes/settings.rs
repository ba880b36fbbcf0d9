use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use tera::Context;

use crate::forms::settings::{ChangePasswordForm, EmailSettingsForm, TwoFactorForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::ServiceError;
use crate::services::settings as settings_service;

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<tera::Tera>,
) -> impl Responder {
    let data = match settings_service::load_settings_page(repo.get_ref(), &user) {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            error!("Failed to load settings page: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", "settings");
    context.insert("home_url", &server_config.auth_service_url);
    if let Some(email) = &data.email {
        context.insert("email_settings", email);
    }
    if let Some(account) = &data.account {
        context.insert("account", account);
    }

    render_template(&tera, "settings/index.html", &context)
}

#[post("/settings/email")]
pub async fn save_email_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EmailSettingsForm>,
) -> impl Responder {
    match settings_service::save_email_settings(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Email settings saved.".to_string()).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to save email settings: {err}");
            FlashMessage::error(format!("Failed to save email settings: {err}")).send();
        }
    }
    redirect("/settings")
}

#[post("/settings/password")]
pub async fn change_password(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ChangePasswordForm>,
) -> impl Responder {
    match settings_service::change_password(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("Password changed.".to_string()).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to change password: {err}");
            FlashMessage::error(format!("Failed to change password: {err}")).send();
        }
    }
    redirect("/settings")
}

#[post("/settings/twofactor")]
pub async fn set_two_factor(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TwoFactorForm>,
) -> impl Responder {
    match settings_service::set_two_factor(repo.get_ref(), &user, &form) {
        Ok(updated) if updated.totp_enabled => {
            FlashMessage::success("Two-factor authentication enabled.".to_string()).send();
        }
        Ok(_) => {
            FlashMessage::success("Two-factor authentication disabled.".to_string()).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to update two-factor settings: {err}");
            FlashMessage::error(format!("Failed to update two-factor settings: {err}")).send();
        }
    }
    redirect("/settings")
}

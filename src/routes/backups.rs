use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use serde::Deserialize;
use tera::Context;

use crate::domain::backup::BackupStatus;
use crate::dto::backups::BackupsQuery;
use crate::forms::backups::{CreateBackupForm, DeleteBackupForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::ServiceError;
use crate::services::backups as backups_service;

#[derive(Deserialize)]
struct BackupsQueryParams {
    q: Option<String>,
    field: Option<String>,
    page: Option<usize>,
}

#[get("/backups")]
pub async fn show_backups(
    params: web::Query<BackupsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<tera::Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = BackupsQuery {
        search: params.q,
        field: params.field,
        page: params.page,
    };

    let data = match backups_service::load_backups_page(repo.get_ref(), &user, query).await {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            error!("Failed to load backups page: {e}");
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
    context.insert("current_page", "backups");
    context.insert("home_url", &server_config.auth_service_url);
    context.insert("backups", &data.backups);
    context.insert("total", &data.total);
    if let Some(q) = &data.search_query {
        context.insert("search_query", q);
    }
    if let Some(field) = &data.search_field {
        context.insert("search_field", field);
    }
    if let Some(fetch_error) = &data.fetch_error {
        context.insert("fetch_error", fetch_error);
    }

    render_template(&tera, "backups/index.html", &context)
}

#[post("/backup/create")]
pub async fn create_backup(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<CreateBackupForm>,
) -> impl Responder {
    match backups_service::create_backup(repo.get_ref(), &user, &server_config, form) {
        Ok(backup) if backup.status == BackupStatus::Completed => {
            FlashMessage::success(format!("Backup {} created.", backup.filename)).send();
        }
        Ok(backup) => {
            FlashMessage::error(format!("Backup {} failed.", backup.filename)).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to create backup: {err}");
            FlashMessage::error(format!("Failed to create backup: {err}")).send();
        }
    }
    redirect("/backups")
}

#[post("/backup/delete")]
pub async fn delete_backup(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<DeleteBackupForm>,
) -> impl Responder {
    match backups_service::delete_backup(repo.get_ref(), &user, &server_config, form) {
        Ok(()) => {
            FlashMessage::success("Backup deleted.".to_string()).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to delete backup: {err}");
            FlashMessage::error(format!("Failed to delete backup: {err}")).send();
        }
    }
    redirect("/backups")
}

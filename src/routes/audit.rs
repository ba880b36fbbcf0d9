use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use log::error;
use serde::Deserialize;
use tera::Context;

use crate::dto::audit::AuditQuery;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::ServiceError;
use crate::services::audit as audit_service;

#[derive(Deserialize)]
struct AuditQueryParams {
    q: Option<String>,
    field: Option<String>,
    page: Option<usize>,
}

#[get("/audit")]
pub async fn show_audit(
    params: web::Query<AuditQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<tera::Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = AuditQuery {
        search: params.q,
        field: params.field,
        page: params.page,
    };

    let data = match audit_service::load_audit_page(repo.get_ref(), &user, query).await {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            error!("Failed to load audit page: {e}");
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
    context.insert("current_page", "audit");
    context.insert("home_url", &server_config.auth_service_url);
    context.insert("events", &data.events);
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

    render_template(&tera, "audit/index.html", &context)
}

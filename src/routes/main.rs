use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use serde::Deserialize;
use tera::Context;

use crate::dto::main::IndexQuery;
use crate::forms::main::{AddStatementForm, UploadStatementsForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::main as main_service;
use crate::services::ServiceError;

#[derive(Deserialize)]
struct IndexQueryParams {
    q: Option<String>,
    field: Option<String>,
    page: Option<usize>,
}

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<tera::Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = IndexQuery {
        search: params.q,
        field: params.field,
        page: params.page,
    };

    let data = match main_service::load_index_page(repo.get_ref(), &user, query).await {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            error!("Failed to load index page: {e}");
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
    context.insert("current_page", "index");
    context.insert("home_url", &server_config.auth_service_url);
    context.insert("statements", &data.statements);
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

    render_template(&tera, "main/index.html", &context)
}

#[post("/statement/add")]
pub async fn add_statement(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddStatementForm>,
) -> impl Responder {
    match main_service::add_statement(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("Statement added.".to_string()).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to add a statement: {err}");
            FlashMessage::error(format!("Failed to add statement: {err}")).send();
        }
    }
    redirect("/")
}

#[post("/statements/upload")]
pub async fn statements_upload(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadStatementsForm>,
) -> impl Responder {
    match main_service::upload_statements(repo.get_ref(), &user, &mut form) {
        Ok(count) => {
            FlashMessage::success(format!("Imported {count} statements.")).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to import statements: {err}");
            FlashMessage::error(format!("Failed to import statements: {err}")).send();
        }
    }
    redirect("/")
}

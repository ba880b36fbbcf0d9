use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use serde::Deserialize;
use tera::Context;

use crate::dto::users::UsersQuery;
use crate::forms::users::{AddUserForm, DeleteUserForm, UpdateUserRoleForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::ServiceError;
use crate::services::users as users_service;

#[derive(Deserialize)]
struct UsersQueryParams {
    q: Option<String>,
    field: Option<String>,
    page: Option<usize>,
}

#[get("/users")]
pub async fn show_users(
    params: web::Query<UsersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<tera::Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = UsersQuery {
        search: params.q,
        field: params.field,
        page: params.page,
    };

    let data = match users_service::load_users_page(repo.get_ref(), &user, query).await {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            error!("Failed to load users page: {e}");
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
    context.insert("current_page", "users");
    context.insert("home_url", &server_config.auth_service_url);
    context.insert("users", &data.users);
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

    render_template(&tera, "users/index.html", &context)
}

#[post("/user/add")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddUserForm>,
) -> impl Responder {
    match users_service::add_user(repo.get_ref(), &user, form) {
        Ok(created) => {
            FlashMessage::success(format!("User {} added.", created.email)).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to add a user: {err}");
            FlashMessage::error(format!("Failed to add user: {err}")).send();
        }
    }
    redirect("/users")
}

#[post("/user/role")]
pub async fn change_user_role(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdateUserRoleForm>,
) -> impl Responder {
    match users_service::change_user_role(repo.get_ref(), &user, form) {
        Ok(updated) => {
            FlashMessage::success(format!("Role updated for {}.", updated.email)).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to change user role: {err}");
            FlashMessage::error(format!("Failed to change role: {err}")).send();
        }
    }
    redirect("/users")
}

#[post("/user/delete")]
pub async fn delete_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteUserForm>,
) -> impl Responder {
    match users_service::delete_user(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("User deleted.".to_string()).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            error!("Failed to delete user: {err}");
            FlashMessage::error(format!("Failed to delete user: {err}")).send();
        }
    }
    redirect("/users")
}

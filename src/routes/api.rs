use actix_web::{HttpResponse, Responder, get, web};
use log::error;
use serde::Deserialize;

use crate::dto::api::StatementsQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::api as api_service;

#[derive(Deserialize)]
struct ApiV1StatementsQueryParams {
    q: Option<String>,
    field: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

#[get("/v1/statements")]
pub async fn api_v1_statements(
    params: web::Query<ApiV1StatementsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = StatementsQuery {
        search: params.q,
        field: params.field,
        page: params.page,
        per_page: params.per_page,
    };

    match api_service::list_statements(repo.get_ref(), &user, query).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(e) => {
            error!("Failed to list statements: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

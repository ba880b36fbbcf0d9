pub mod query;

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role granting read access to the console.
pub const SERVICE_ACCESS_ROLE: &str = "console";
/// Role granting administrative mutations (users, backups, settings, imports).
pub const SERVICE_ADMIN_ROLE: &str = "console_admin";
/// Role granting read access to the audit trail without admin rights.
pub const SERVICE_AUDITOR_ROLE: &str = "console_auditor";

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware as actix_middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::db::establish_connection_pool;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::api::api_v1_statements;
    use crate::routes::audit::show_audit;
    use crate::routes::backups::{create_backup, delete_backup, show_backups};
    use crate::routes::main::{add_statement, show_index, statements_upload};
    use crate::routes::settings::{
        change_password, save_email_settings, set_two_factor, show_settings,
    };
    use crate::routes::users::{add_user, change_user_role, delete_user, show_users};
    use crate::routes::{logout, not_assigned};

    /// Builds and runs the Actix-Web HTTP server using the provided
    /// configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(actix_middleware::Compress::default())
                .wrap(actix_middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(not_assigned)
                .service(web::scope("/api").service(api_v1_statements))
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(show_index)
                        .service(add_statement)
                        .service(statements_upload)
                        .service(show_users)
                        .service(add_user)
                        .service(change_user_role)
                        .service(delete_user)
                        .service(show_audit)
                        .service(show_backups)
                        .service(create_backup)
                        .service(delete_backup)
                        .service(show_settings)
                        .service(save_email_settings)
                        .service(change_password)
                        .service(set_two_factor)
                        .service(logout),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}

#[cfg(feature = "server")]
pub use server::run;

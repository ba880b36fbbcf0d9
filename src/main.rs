use meridian_admin::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config_name = std::env::var("CONFIG").unwrap_or_else(|_| "config".to_string());
    let server_config: ServerConfig = config::Config::builder()
        .add_source(config::File::with_name(&config_name))
        .add_source(config::Environment::default())
        .build()
        .and_then(config::Config::try_deserialize)
        .map_err(|e| std::io::Error::other(format!("Failed to load configuration: {e}")))?;

    meridian_admin::run(server_config).await
}

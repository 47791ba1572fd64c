use std::env;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::{Config, Environment, File};
use dotenvy::dotenv;
use env_logger::Env;

use greenhead_admin::assets::{AssetHost, HttpAssetHost};
use greenhead_admin::db::{establish_connection_pool, run_migrations};
use greenhead_admin::mailer::{HttpMailer, Mailer};
use greenhead_admin::models::config::ServerConfig;
use greenhead_admin::repository::DieselRepository;
use greenhead_admin::routes::{configure, json_error_handler};

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("allowed_origins"),
        )
        .build()?
        .try_deserialize()
}

fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }
    let repo = DieselRepository::new(pool);

    let mailer: Arc<dyn Mailer> = match HttpMailer::new(&server_config.mail) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            log::error!("Failed to build mail client: {e}");
            std::process::exit(1);
        }
    };
    let assets: Arc<dyn AssetHost> = match HttpAssetHost::new(&server_config.assets) {
        Ok(assets) => Arc::new(assets),
        Err(e) => {
            log::error!("Failed to build asset host client: {e}");
            std::process::exit(1);
        }
    };

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting server at http://{}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&server_config.allowed_origins))
            .wrap(Logger::default())
            .app_data(
                web::JsonConfig::default()
                    .limit(server_config.json_limit_bytes)
                    .error_handler(json_error_handler),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(assets.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}

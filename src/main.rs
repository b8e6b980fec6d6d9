use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;

use taskhub::auth::{BcryptHasher, JwtTokenService};
use taskhub::config::Config;
use taskhub::directory::PgUserDirectory;
use taskhub::routes;
use taskhub::state::AppState;
use taskhub::store::PgTaskStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let state = AppState::new(
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(PgTaskStore::new(pool)),
        Arc::new(BcryptHasher::new()),
        Arc::new(JwtTokenService::new(&config.jwt_secret)),
    );

    log::info!("starting server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

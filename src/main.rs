use std::env;
use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use dotenvy::dotenv;

use bookstore::auth::TokenIssuer;
use bookstore::db::{DbPool, establish_connection_pool};
use bookstore::mail::{Mailer, mailer_from_config};
use bookstore::models::config::ServerConfig;
use bookstore::otp::OtpStore;
use bookstore::payments::{PaymentGateway, RazorpayClient};
use bookstore::repository::DieselRepository;
use bookstore::routes::configure;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How often expired one-time passcodes are swept.
const OTP_PURGE_INTERVAL: Duration = Duration::from_secs(60);

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

fn run_migrations(pool: &DbPool) -> Result<(), String> {
    let mut conn = pool.get().map_err(|e| e.to_string())?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| e.to_string())?;
    log::info!("Applied {} pending migrations", applied.len());
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load server configuration: {e}");
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
    let issuer = TokenIssuer::new(&server_config.jwt_secret, server_config.token_ttl_hours);
    let mailer: Arc<dyn Mailer> = mailer_from_config(&server_config.mail);
    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(RazorpayClient::new(server_config.razorpay.clone()));
    let otp_store = web::Data::new(OtpStore::new(Duration::from_secs(
        server_config.otp_ttl_seconds,
    )));

    let sweeper = otp_store.clone();
    actix_web::rt::spawn(async move {
        let mut ticker = actix_web::rt::time::interval(OTP_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = sweeper.purge_expired();
            if purged > 0 {
                log::debug!("Purged {purged} expired one-time passcodes");
            }
        }
    });

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting bookstore API on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(issuer.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(otp_store.clone())
            .app_data(web::Data::new(server_config.clone()))
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}

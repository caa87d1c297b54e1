use std::sync::Arc;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use tera::Tera;

use canteen_orders::config::{InvoiceStorageConfig, ServerConfig};
use canteen_orders::db::{establish_connection_pool, run_migrations};
use canteen_orders::invoice::{HttpInvoiceStore, LocalInvoiceStore};
use canteen_orders::repository::DieselRepository;
use canteen_orders::routes;
use canteen_orders::routes::invoices::SharedInvoiceStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();

    let secret_key = match &config.secret {
        Some(key) if key.len() >= 64 => Key::from(key.as_bytes()),
        Some(_) => {
            log::error!("SECRET_KEY must be at least 64 bytes long");
            std::process::exit(1);
        }
        None => {
            log::warn!("SECRET_KEY is not set, sessions will not survive a restart");
            Key::generate()
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);

    let tera = match Tera::new(&config.templates) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let store: Arc<SharedInvoiceStore> = match &config.invoice_storage {
        InvoiceStorageConfig::Local { root } => {
            log::info!("Storing invoices under {}", root.display());
            Arc::new(LocalInvoiceStore::new(root.clone()))
        }
        InvoiceStorageConfig::Http {
            endpoint,
            bucket,
            token,
        } => {
            log::info!("Storing invoices in bucket {bucket} at {endpoint}");
            Arc::new(
                HttpInvoiceStore::new(endpoint.clone(), bucket.clone())
                    .with_bearer_token(token.clone()),
            )
        }
    };
    let store = web::Data::from(store);

    let domain = config.domain.clone();
    let address = config.address.clone();
    let port = config.port;

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(domain.clone()))
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(store.clone())
    })
    .bind((address, port))?
    .run()
    .await
}

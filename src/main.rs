use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aidant_core::config::{LoggingSettings, Settings, StoreBackend};
use aidant_core::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use aidant_core::{Aggregator, InMemoryStore, PostgresStore, RecordStore};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

/// `RUST_LOG` takes precedence over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            return Err(startup_error("Failed to load configuration", e));
        }
    };

    init_logging(&settings.logging);
    info!("Starting Aidant core service...");

    let analytics = settings
        .analytics
        .to_config()
        .map_err(|e| startup_error("Invalid analytics settings", e))?;

    let (store, backend): (Arc<dyn RecordStore>, &'static str) = match settings.store.backend {
        StoreBackend::Postgres => {
            let store = PostgresStore::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;
            (Arc::new(store), "postgres")
        }
        StoreBackend::Memory => {
            let store = match &settings.store.seed_path {
                Some(path) => InMemoryStore::load(path)
                    .await
                    .map_err(|e| startup_error("Failed to load seed data", e))?,
                None => InMemoryStore::new(),
            };
            (Arc::new(store), "memory")
        }
    };

    info!(
        "Record store initialized ({}), analytics in {} with {} reporting",
        backend,
        analytics.timezone.name(),
        analytics.currency
    );

    let app_state = AppState::new(
        store.clone(),
        Aggregator::new(store, analytics),
        settings.server.request_timeout(),
        backend,
    );

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

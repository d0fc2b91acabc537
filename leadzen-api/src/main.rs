use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use leadzen_api::config::ApiConfig;
use leadzen_api::handlers::{self, settings::SettingsAppState};
use leadzen_api::{database, helpers, Database};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[get("/health")]
async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    if db.is_healthy() {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        }))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Config file to use instead of the one in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("leadzen-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path.as_deref());

    // Load config
    let (config, config_path) = match &args.config {
        Some(path) => ApiConfig::load_from(path),
        None => ApiConfig::load(),
    }
    .map_err(io_error)?;
    tracing::info!("Using config at {:?}", config_path);

    // Initialize database
    let db = helpers::database::initialize_database().map_err(io_error)?;
    if let Ok(db_path) = helpers::database::get_db_path() {
        tracing::info!("Database initialized at: {:?}", db_path);
    }

    if config.seed_demo_data() {
        if let Err(e) = database::seed::seed_demo_data(db.async_connection.clone()).await {
            tracing::warn!("Failed to seed demo data: {}", e);
        }
    }

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    let store_config = config.store();
    let settings_state = SettingsAppState {
        config: Arc::new(config.clone()),
        config_path,
    };

    tracing::info!("Starting server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(store_config))
            .app_data(web::Data::new(settings_state.clone()))
            .service(health)
            .route("/api/settings", web::get().to(handlers::settings::get_settings))
            .route("/api/permissions", web::get().to(handlers::settings::get_permission_policy))
            .route("/api/leads", web::get().to(handlers::leads::list_leads))
            .route("/api/leads", web::post().to(handlers::leads::create_lead))
            .route("/api/leads/t9", web::get().to(handlers::leads::t9_search))
            .route("/api/leads/{id}", web::get().to(handlers::leads::get_lead))
            .route("/api/leads/{id}", web::put().to(handlers::leads::update_lead))
            .route("/api/leads/{id}", web::delete().to(handlers::leads::delete_lead))
            .route("/api/leads/{id}/notes", web::get().to(handlers::notes::list_notes))
            .route("/api/leads/{id}/notes", web::post().to(handlers::notes::create_note))
            .route("/api/notes/{id}", web::put().to(handlers::notes::update_note))
            .route("/api/notes/{id}", web::delete().to(handlers::notes::delete_note))
            .route("/api/contacts", web::get().to(handlers::contacts::list_contacts))
            .route("/api/contacts", web::post().to(handlers::contacts::create_contact))
            .route("/api/contacts/{id}", web::get().to(handlers::contacts::get_contact))
            .route("/api/contacts/{id}/favorite", web::post().to(handlers::contacts::toggle_favorite))
            .route("/api/calls", web::get().to(handlers::call_logs::list_call_logs))
            .route("/api/calls", web::post().to(handlers::call_logs::create_call_log))
            .route("/api/calls/match", web::get().to(handlers::call_logs::match_phone))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await
}

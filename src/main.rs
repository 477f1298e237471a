use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use optimaize::api::middleware::ApiKeyAuth;
use optimaize::cli::{
    commands::{Cli, Commands},
    run_cli,
};
use optimaize::config::AppConfig;
use optimaize::llm::{openai::OpenAiClient, CompletionProvider, TranscriptionProvider};
use optimaize::store;
use std::sync::Arc;
use tracing::{error, info};

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

async fn index() -> impl Responder {
    let html = include_str!("../static/index.html");
    HttpResponse::Ok().content_type("text/html").body(html)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve) {
        run_cli(cli.command, cli.config).await;
        return Ok(());
    }

    info!("Starting Optimaize AI Chat Server...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match store::get_connection(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize store: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.uploads.dir) {
        error!("Failed to create uploads directory: {}", e);
        std::process::exit(1);
    }

    let openai = Arc::new(OpenAiClient::new(&config.openai));
    let completion: Arc<dyn CompletionProvider> = openai.clone();
    let transcription: Arc<dyn TranscriptionProvider> = openai;

    let host = config.server.host.clone();
    let port = config.server.port;
    let uploads_dir = config.uploads.dir.clone();

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(completion.clone()))
            .app_data(web::Data::new(transcription.clone()))
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health))
            .service(actix_files::Files::new("/uploads", &uploads_dir))
            .wrap(ApiKeyAuth)
            .configure(optimaize::api::routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}

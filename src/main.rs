mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod rooms;
mod routes;
mod services;
mod state;
mod utils;
mod websocket;

use config::Config;
use db::{CodeBlockStore, DbCodeBlocks, MemoryCodeBlocks};
use routes::create_app;
use services::{spawn_room_sweep, CodeBlockService};
use state::AppState;
use std::panic;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "coderoom=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });
    if config.is_development() {
        info!("Running in {} mode", config.environment);
    }

    let store = open_code_block_store(&config).await;
    let code_blocks = CodeBlockService::new(store, config.template_cache_ttl());
    let app_state = AppState::new(code_blocks);

    if let Some(every) = config.sweep_interval() {
        spawn_room_sweep(app_state.sessions.clone(), every);
    } else {
        warn!("Room sweep disabled - ghost connections are only pruned on join");
    }

    let app_routes = create_app(app_state, &config);

    // Start the HTTP/WebSocket server
    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("🚀 {} running on http://{}", config.service_name, config.server_address());
    info!("📡 WebSocket available at ws://{}/ws", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}

/// Postgres when a database URL is configured and reachable, in-memory templates otherwise
async fn open_code_block_store(config: &Config) -> Arc<dyn CodeBlockStore> {
    let Some(db_url) = &config.db_url else {
        warn!("No database URL configured - using in-memory code blocks");
        return Arc::new(MemoryCodeBlocks::seeded());
    };

    let db = match DbCodeBlocks::new(db_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            warn!("Falling back to in-memory code blocks");
            return Arc::new(MemoryCodeBlocks::seeded());
        }
    };

    if let Err(e) = db.ensure_schema().await {
        error!("Failed to create code block schema: {}", e);
        warn!("Falling back to in-memory code blocks");
        return Arc::new(MemoryCodeBlocks::seeded());
    }

    if config.seed_code_blocks {
        if let Err(e) = db.seed_if_empty(db::seed::initial_code_blocks()).await {
            error!("Failed to seed code blocks: {}", e);
        }
    }

    info!("Database initialized successfully");
    Arc::new(db)
}

//! Hookfeed server
//!
//! Receives webhooks, turns them into feed events through per-feed
//! transformations, and serves each feed as an Atom document.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use clap::{CommandFactory, Parser};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod cli;
mod config;
mod domain;
mod entity;
mod error;
mod feed;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    sqlite::{connect, init_schema},
    SqliteEventRepository, SqliteFeedRepository, YamlFeedDefinitions, YamlTransformSource,
};
use app::{FeedCatalog, IngestService, SyndicationService, TransformRegistry};
use cli::Cli;
use config::Config;

pub type Catalog = FeedCatalog<SqliteFeedRepository, YamlFeedDefinitions>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<TransformRegistry>,
    pub ingest_service: Arc<IngestService<SqliteEventRepository>>,
    pub syndication_service:
        Arc<SyndicationService<SqliteFeedRepository, YamlFeedDefinitions, SqliteEventRepository>>,
    pub catalog: Arc<Catalog>,
    pub events: Arc<SqliteEventRepository>,
    pub feeds: Arc<SqliteFeedRepository>,
}

/// Connect the store, bootstrap the schema and wire the services
pub async fn build_state(config: Config) -> anyhow::Result<AppState> {
    tracing::info!("Connecting to database...");
    let db = connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.database_url))?;
    init_schema(&db)
        .await
        .context("Failed to initialize database schema")?;
    tracing::info!("Database connected");

    // Create adapters
    let events = Arc::new(SqliteEventRepository::new(db.clone(), config.max_items));
    let feeds = Arc::new(SqliteFeedRepository::new(db));
    let definitions = Arc::new(YamlFeedDefinitions::new(config.feed_definitions.clone()));

    let registry = Arc::new(TransformRegistry::unloaded(Box::new(
        YamlTransformSource::new(config.transforms.clone()),
    )));
    if let Err(e) = registry.reload() {
        tracing::warn!(error = %e, "No transformations loaded; webhooks will be rejected");
    }

    // Create application services
    let catalog = Arc::new(FeedCatalog::new(feeds.clone(), definitions));
    let ingest_service = Arc::new(IngestService::new(registry.clone(), events.clone()));
    let syndication_service = Arc::new(SyndicationService::new(
        catalog.clone(),
        events.clone(),
        config.base_url.clone(),
    ));

    Ok(AppState {
        config: Arc::new(config),
        registry,
        ingest_service,
        syndication_service,
        catalog,
        events,
        feeds,
    })
}

/// Build the HTTP router
pub fn router(state: AppState) -> anyhow::Result<Router> {
    let webhook_routes = Router::new()
        .route("/webhook/:feed_id", post(handlers::ingest_webhook))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::feed_token_middleware,
        ));

    // Rate limiting: one request per 100ms sustained per client IP, burst of 20.
    // PeerIpKeyExtractor reads the socket address, so the server must be run
    // with connect info.
    let webhook_routes = if state.config.rate_limit {
        let governor_config = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_millisecond(100)
                .burst_size(20)
                .finish()
                .context("Failed to build governor config")?,
        );
        webhook_routes.layer(GovernorLayer {
            config: governor_config,
        })
    } else {
        webhook_routes
    };

    let app = Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/diagnostics", get(handlers::get_diagnostics))
        .route("/feeds", get(handlers::list_feeds))
        .route("/feeds/:feed_id", get(handlers::list_events))
        .route("/:feed_file", get(handlers::get_atom))
        .merge(webhook_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Reload transformations whenever the process receives SIGHUP
#[cfg(unix)]
fn reload_on_sighup(registry: Arc<TransformRegistry>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGHUP; hot reload disabled");
                return;
            }
        };
        while hangups.recv().await.is_some() {
            match registry.reload() {
                Ok(count) => tracing::info!(count, "Transformations reloaded on SIGHUP"),
                Err(e) => tracing::error!(error = %e, "Reload failed; keeping previous table"),
            }
        }
    });
}

#[cfg(not(unix))]
fn reload_on_sighup(_registry: Arc<TransformRegistry>) {}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let port = state.config.port;
    reload_on_sighup(state.registry.clone());
    let app = router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hookfeed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if !cli.has_action() {
        Cli::command().print_help()?;
        return Ok(());
    }

    // Load configuration
    let mut config = Config::from_env();
    if let Some(path) = &cli.db_path {
        config = config.with_db_path(path);
    }

    let state = build_state(config).await?;
    cli::run_commands(&cli, &state).await?;

    if cli.run {
        tracing::info!("Starting hookfeed...");
        serve(state).await?;
    }

    Ok(())
}

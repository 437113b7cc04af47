use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use fighter_lookup::config::{LoggingSettings, Settings};
use fighter_lookup::core::{Extractor, Matcher};
use fighter_lookup::routes::{self, handle_query_payload_error, AppState};
use fighter_lookup::services::{FighterSource, HttpUpstream, Resolver, RosterCache, SystemClock};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
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
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = Settings::load();
    let logging = loaded
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting fighter lookup service...");

    let settings = loaded.unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    let upstream = HttpUpstream::new(
        settings.upstream.roster_url.clone(),
        settings.upstream.detail_base_url.clone(),
        settings.upstream.timeout(),
        &settings.upstream.user_agent,
    )
    .map_err(|e| {
        error!("Failed to create HTTP client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!(
        "Upstream client initialized (roster: {}, detail: {}, timeout: {}s)",
        upstream.roster_url(),
        settings.upstream.detail_base_url,
        settings.upstream.timeout_secs
    );

    let source: Arc<dyn FighterSource> = Arc::new(upstream);
    let extractor = Arc::new(Extractor::new(settings.extraction.schema()));

    let roster = RosterCache::new(
        source.clone(),
        extractor.clone(),
        Arc::new(SystemClock),
        settings.cache.ttl(),
    );

    let resolver = Resolver::new(
        roster,
        source,
        extractor,
        Matcher::new(settings.search.min_query_len),
    )
    .with_search_limit(settings.search.max_results);

    info!(
        "Resolver initialized (roster TTL: {}s, {} schema fields)",
        resolver.roster_cache().ttl().num_seconds(),
        settings.extraction.schema().fields.len()
    );

    // Warm the roster; the first request retries if this fails
    match resolver.roster_cache().refresh().await {
        Ok(roster) => info!("Roster warmed with {} fighters", roster.len()),
        Err(e) => warn!("Roster warm-up failed, will fetch on first request: {}", e),
    }

    let app_state = AppState {
        resolver: Arc::new(resolver),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
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

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, FighterQuery, HealthResponse};
use crate::services::{ResolveError, Resolver};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

/// Configure all fighter-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/fighter", web::get().to(get_fighter));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let roster = state.resolver.roster_cache().status();

    let status = if roster.loaded && !roster.stale {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        roster,
    })
}

/// Fighter lookup endpoint
///
/// GET /api/fighter?name={query}
/// GET /api/fighter?id={identifier}
/// GET /api/fighter?search={fragment}&limit={n}
///
/// `name` and `id` return a single profile; `search` returns an array of
/// `{ "id", "name" }` for incremental search boxes.
async fn get_fighter(
    state: web::Data<AppState>,
    query: web::Query<FighterQuery>,
) -> Result<HttpResponse, ResolveError> {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for fighter query: {:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Invalid query: {}", errors),
            code: "bad_request".to_string(),
            status_code: 400,
        }));
    }

    let query = query.into_inner();
    let resolver = &state.resolver;

    if let Some(name) = query.name.as_deref() {
        tracing::info!("Resolving fighter by name: {:?}", name);
        let detail = resolver.resolve(name).await?;
        return Ok(HttpResponse::Ok().json(detail));
    }

    if let Some(id) = query.id.as_deref() {
        tracing::info!("Resolving fighter by id: {:?}", id);
        let detail = resolver.fighter_detail(id).await?;
        return Ok(HttpResponse::Ok().json(detail));
    }

    if let Some(fragment) = query.search.as_deref() {
        let hits = resolver.search_fighters(fragment, query.limit).await?;
        return Ok(HttpResponse::Ok().json(hits));
    }

    Err(ResolveError::BadRequest(
        "Missing name, id or search query".to_string(),
    ))
}

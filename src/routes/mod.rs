//! Rutas HTTP
//!
//! El catálogo, el login y las fotos son públicos; el resto de la API
//! exige el token de administración.

pub mod analytics_routes;
pub mod auth_routes;
pub mod catalog_routes;
pub mod transfer_routes;
pub mod truck_routes;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{cors_layer, require_admin};
use crate::repositories::photo_repository::IMAGES_ROUTE;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .nest("/api/trucks", truck_routes::create_truck_router())
        .nest("/api/analytics", analytics_routes::create_analytics_router())
        .nest("/api/transfer", transfer_routes::create_transfer_router())
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health))
        .nest("/api/catalog", catalog_routes::create_catalog_router())
        .nest("/api/auth", auth_routes::create_auth_router())
        .merge(admin)
        .nest_service(IMAGES_ROUTE, ServeDir::new(&state.config.images_dir))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

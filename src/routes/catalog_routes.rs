use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::truck_controller::TruckController;
use crate::dto::ApiResponse;
use crate::models::catalog::{CatalogEntry, CatalogFilters, FilterOptions};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Catálogo público, sin autenticación
pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_catalog))
        .route("/filters", get(catalog_filters))
}

async fn list_catalog(
    State(state): State<AppState>,
    Query(filters): Query<CatalogFilters>,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.catalog(&filters).await?))
}

async fn catalog_filters(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FilterOptions>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.catalog_filters().await?))
}

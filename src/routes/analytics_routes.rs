use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::truck_controller::TruckController;
use crate::dto::ApiResponse;
use crate::models::analytics::InventorySummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_analytics_router() -> Router<AppState> {
    Router::new().route("/summary", get(summary))
}

async fn summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InventorySummary>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.summary().await?))
}

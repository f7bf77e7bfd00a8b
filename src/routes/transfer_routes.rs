use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::truck_controller::{read_file_multipart, TruckController};
use crate::dto::truck_dto::ImportQuery;
use crate::dto::ApiResponse;
use crate::services::transfer_service::{ImportOutcome, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transfer_router() -> Router<AppState> {
    Router::new()
        .route("/export", get(export_inventory))
        .route("/import", post(import_inventory))
}

async fn export_inventory(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    let bytes = controller.export().await?;

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        bytes,
    ))
}

async fn import_inventory(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ImportOutcome>>, AppError> {
    let bytes = read_file_multipart(multipart).await?;
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.import(&bytes, query.dry_run).await?))
}

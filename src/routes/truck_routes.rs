use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::truck_controller::{read_truck_multipart, TruckController};
use crate::dto::truck_dto::TruckResponse;
use crate::dto::ApiResponse;
use crate::models::catalog::{InventoryFilterOptions, InventoryFilters};
use crate::models::truck::Truck;
use crate::services::DeleteRequest;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_truck_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trucks).post(create_truck))
        .route("/filters", get(inventory_filters))
        .route("/:id", get(get_truck).put(update_truck))
        .route("/:id/sold", post(mark_sold))
        .route("/:id/available", post(mark_available))
        .route("/:id/delete-request", post(request_delete))
        .route("/:id/delete-confirmation", post(confirm_delete))
}

async fn list_trucks(
    State(state): State<AppState>,
    Query(filters): Query<InventoryFilters>,
) -> Result<Json<ApiResponse<Vec<TruckResponse>>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.list(&filters).await?))
}

async fn inventory_filters(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InventoryFilterOptions>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.inventory_filters().await?))
}

async fn get_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TruckResponse>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.get(&id).await?))
}

async fn create_truck(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TruckResponse>>, AppError> {
    let (form, photo) = read_truck_multipart(multipart).await?;
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.create(form, photo).await?))
}

async fn update_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TruckResponse>>, AppError> {
    let (form, photo) = read_truck_multipart(multipart).await?;
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.update(&id, form, photo).await?))
}

async fn mark_sold(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TruckResponse>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.mark_sold(&id).await?))
}

async fn mark_available(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TruckResponse>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.mark_available(&id).await?))
}

async fn request_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteRequest>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.request_delete(&id).await?))
}

async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    let controller = TruckController::new(state.inventory.clone());
    Ok(Json(controller.confirm_delete(&id, request).await?))
}

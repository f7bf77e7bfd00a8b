use std::sync::Arc;

use axum::extract::Multipart;

use crate::dto::truck_dto::TruckResponse;
use crate::dto::ApiResponse;
use crate::models::analytics::InventorySummary;
use crate::models::catalog::{
    CatalogEntry, CatalogFilters, FilterOptions, InventoryFilterOptions, InventoryFilters,
};
use crate::models::truck::{Truck, TruckForm, UploadedPhoto};
use crate::services::transfer_service::ImportOutcome;
use crate::services::{DeleteRequest, InventoryService};
use crate::utils::errors::{AppError, AppResult};

pub struct TruckController {
    inventory: Arc<InventoryService>,
}

impl TruckController {
    pub fn new(inventory: Arc<InventoryService>) -> Self {
        Self { inventory }
    }

    fn response(&self, truck: Truck) -> TruckResponse {
        TruckResponse::new(truck, self.inventory.photos())
    }

    pub async fn list(&self, filters: &InventoryFilters) -> AppResult<ApiResponse<Vec<TruckResponse>>> {
        let trucks = self.inventory.list_inventory(filters).await?;
        Ok(ApiResponse::success(
            trucks.into_iter().map(|t| self.response(t)).collect(),
        ))
    }

    pub async fn get(&self, id: &str) -> AppResult<ApiResponse<TruckResponse>> {
        let truck = self.inventory.get(id).await?;
        Ok(ApiResponse::success(self.response(truck)))
    }

    pub async fn create(
        &self,
        mut form: TruckForm,
        photo: Option<UploadedPhoto>,
    ) -> AppResult<ApiResponse<TruckResponse>> {
        // El id de un camión nuevo siempre lo genera el servidor
        form.id = None;
        let truck = self.inventory.create_or_update(form, photo).await?;
        Ok(ApiResponse::success_with_message(
            self.response(truck),
            "Camión creado exitosamente",
        ))
    }

    pub async fn update(
        &self,
        id: &str,
        mut form: TruckForm,
        photo: Option<UploadedPhoto>,
    ) -> AppResult<ApiResponse<TruckResponse>> {
        form.id = Some(id.to_string());
        let truck = self.inventory.create_or_update(form, photo).await?;
        Ok(ApiResponse::success_with_message(
            self.response(truck),
            "Camión actualizado exitosamente",
        ))
    }

    pub async fn mark_sold(&self, id: &str) -> AppResult<ApiResponse<TruckResponse>> {
        let truck = self.inventory.mark_sold(id).await?;
        Ok(ApiResponse::success_with_message(
            self.response(truck),
            "Camión marcado como vendido",
        ))
    }

    pub async fn mark_available(&self, id: &str) -> AppResult<ApiResponse<TruckResponse>> {
        let truck = self.inventory.mark_available(id).await?;
        Ok(ApiResponse::success_with_message(
            self.response(truck),
            "Camión marcado como disponible",
        ))
    }

    pub async fn request_delete(&self, id: &str) -> AppResult<ApiResponse<DeleteRequest>> {
        let request = self.inventory.request_delete(id).await?;
        let message = format!(
            "Confirme el borrado de {}; esta acción no se puede deshacer",
            request.summary
        );
        Ok(ApiResponse::success_with_message(request, message))
    }

    pub async fn confirm_delete(
        &self,
        id: &str,
        request: DeleteRequest,
    ) -> AppResult<ApiResponse<Truck>> {
        if request.truck_id != id {
            return Err(AppError::BadRequest(
                "La confirmación no corresponde a este camión".to_string(),
            ));
        }
        let removed = self.inventory.confirm_delete(&request).await?;
        Ok(ApiResponse::success_with_message(
            removed,
            "Camión eliminado exitosamente",
        ))
    }

    pub async fn catalog(&self, filters: &CatalogFilters) -> AppResult<ApiResponse<Vec<CatalogEntry>>> {
        Ok(ApiResponse::success(self.inventory.list_available(filters).await?))
    }

    pub async fn catalog_filters(&self) -> AppResult<ApiResponse<FilterOptions>> {
        Ok(ApiResponse::success(self.inventory.filter_options().await?))
    }

    pub async fn inventory_filters(&self) -> AppResult<ApiResponse<InventoryFilterOptions>> {
        Ok(ApiResponse::success(
            self.inventory.inventory_filter_options().await?,
        ))
    }

    pub async fn summary(&self) -> AppResult<ApiResponse<InventorySummary>> {
        Ok(ApiResponse::success(self.inventory.summary().await?))
    }

    pub async fn export(&self) -> AppResult<Vec<u8>> {
        self.inventory.export().await
    }

    pub async fn import(&self, bytes: &[u8], dry_run: bool) -> AppResult<ApiResponse<ImportOutcome>> {
        let outcome = self.inventory.import(bytes, dry_run).await?;
        let message = if outcome.dry_run {
            format!("Archivo válido: {} camiones", outcome.record_count)
        } else {
            format!("{} camiones importados exitosamente", outcome.record_count)
        };
        Ok(ApiResponse::success_with_message(outcome, message))
    }
}

/// Lee un formulario multipart con el campo `truck` (JSON) y `photo` opcional
pub async fn read_truck_multipart(
    mut multipart: Multipart,
) -> AppResult<(TruckForm, Option<UploadedPhoto>)> {
    let mut form: Option<TruckForm> = None;
    let mut photo: Option<UploadedPhoto> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "truck" => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed = serde_json::from_str(&text).map_err(|e| {
                    AppError::BadRequest(format!("Campo 'truck' inválido: {}", e))
                })?;
                form = Some(parsed);
            }
            "photo" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Un input de archivo vacío llega sin nombre ni contenido
                if !file_name.is_empty() || !bytes.is_empty() {
                    photo = Some(UploadedPhoto {
                        bytes: bytes.to_vec(),
                        file_name,
                    });
                }
            }
            _ => {}
        }
    }

    let form = form.ok_or_else(|| AppError::BadRequest("Falta el campo 'truck'".to_string()))?;
    Ok((form, photo))
}

/// Lee el campo `file` de un formulario multipart
pub async fn read_file_multipart(mut multipart: Multipart) -> AppResult<Vec<u8>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(multipart_error)?;
            return Ok(bytes.to_vec());
        }
    }
    Err(AppError::BadRequest("Falta el campo 'file'".to_string()))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Formulario multipart inválido: {}", e))
}

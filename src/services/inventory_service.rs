//! Servicio de inventario
//!
//! Operaciones que modifican registros: alta y edición con foto, cambios de
//! estado y borrado en dos fases. Combina el repository del archivo con el
//! de fotos; cada operación lee el archivo, aplica el cambio y lo reescribe.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::models::analytics::InventorySummary;
use crate::models::catalog::{
    CatalogEntry, CatalogFilters, FilterOptions, InventoryFilterOptions, InventoryFilters,
};
use crate::models::truck::{new_truck_id, today, Truck, TruckForm, UploadedPhoto};
use crate::repositories::{PhotoRepository, TruckRepository};
use crate::services::transfer_service::{self, ImportOutcome};
use crate::services::{analytics_service, catalog_service};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_photo_extension;

/// Solicitud de borrado pendiente de confirmación
///
/// La guarda quien llama; cancelar es simplemente descartarla.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub truck_id: String,
    pub summary: String,
    pub has_photo: bool,
    pub requested_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DeleteRequest {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

pub struct InventoryService {
    trucks: TruckRepository,
    photos: PhotoRepository,
    delete_ttl: Duration,
    whatsapp_number: String,
}

impl InventoryService {
    pub fn new(
        trucks: TruckRepository,
        photos: PhotoRepository,
        delete_ttl_secs: u64,
        whatsapp_number: impl Into<String>,
    ) -> Self {
        Self {
            trucks,
            photos,
            delete_ttl: Duration::seconds(delete_ttl_secs as i64),
            whatsapp_number: whatsapp_number.into(),
        }
    }

    pub fn trucks(&self) -> &TruckRepository {
        &self.trucks
    }

    pub fn photos(&self) -> &PhotoRepository {
        &self.photos
    }

    /// Crea el archivo de inventario y el directorio de fotos si faltan
    pub async fn initialize(&self) -> AppResult<()> {
        self.trucks.ensure_initialized().await?;
        self.photos.ensure_initialized().await
    }

    pub async fn load_all(&self) -> AppResult<Vec<Truck>> {
        self.trucks.load_all().await
    }

    pub async fn save_all(&self, trucks: &[Truck]) -> AppResult<()> {
        self.trucks.save_all(trucks).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Truck> {
        self.trucks
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Truck", id))
    }

    /// Alta (sin `id`) o edición en sitio (con `id`), con foto opcional
    pub async fn create_or_update(
        &self,
        mut form: TruckForm,
        photo: Option<UploadedPhoto>,
    ) -> AppResult<Truck> {
        form.normalize();
        form.validate()?;
        let photo = match photo {
            Some(photo) => Some(checked_photo(photo)?),
            None => None,
        };
        let today = today();

        match form.id.clone() {
            Some(id) => {
                let current = self.get(&id).await?;
                let previous_photo = current.photo_path.clone();
                let mut updated = form.apply_to(current, today);

                let new_photo = match photo {
                    Some((photo, extension)) => {
                        Some(self.photos.save(&photo.bytes, &id, &extension).await?)
                    }
                    None => None,
                };
                if let Some(stored) = &new_photo {
                    updated.photo_path = Some(stored.clone());
                }

                let saved = match self.trucks.update_by_id(&id, updated).await {
                    Ok(saved) => saved,
                    Err(e) => {
                        // El registro sigue apuntando a la foto anterior
                        let orphan = new_photo.filter(|s| Some(s) != previous_photo.as_ref());
                        if let Some(stored) = orphan {
                            self.discard_photo(&stored).await;
                        }
                        return Err(e);
                    }
                };

                if let (Some(stored), Some(previous)) = (&new_photo, &previous_photo) {
                    if stored != previous {
                        self.photos.delete_if_exists(previous).await?;
                    }
                }

                info!("✏️ Camión actualizado: {} ({})", saved.display_name(), saved.id);
                Ok(saved)
            }
            None => {
                let mut truck = form.into_new_truck(new_truck_id(), today);

                if let Some((photo, extension)) = photo {
                    let stored = self.photos.save(&photo.bytes, &truck.id, &extension).await?;
                    truck.photo_path = Some(stored);
                }

                match self.trucks.insert(truck.clone()).await {
                    Ok(saved) => {
                        info!("🚚 Camión creado: {} ({})", saved.display_name(), saved.id);
                        Ok(saved)
                    }
                    Err(e) => {
                        if let Some(stored) = &truck.photo_path {
                            warn!("⚠️ Alta fallida, eliminando foto {}", stored);
                            self.discard_photo(stored).await;
                        }
                        Err(e)
                    }
                }
            }
        }
    }

    /// Limpieza de una foto tras un fallo; el error original es el que se devuelve
    async fn discard_photo(&self, photo_path: &str) {
        if let Err(e) = self.photos.delete_if_exists(photo_path).await {
            warn!("⚠️ No se pudo eliminar la foto {}: {}", photo_path, e);
        }
    }

    /// Estado → vendido, fecha de venta → hoy
    pub async fn mark_sold(&self, id: &str) -> AppResult<Truck> {
        let today = today();
        let truck = self.trucks.update_with(id, |t| t.mark_sold(today)).await?;
        info!("💰 Camión vendido: {} ({})", truck.display_name(), truck.id);
        Ok(truck)
    }

    /// Estado → disponible, fecha de venta → nula
    pub async fn mark_available(&self, id: &str) -> AppResult<Truck> {
        let truck = self.trucks.update_with(id, Truck::mark_available).await?;
        info!("🔄 Camión disponible nuevamente: {} ({})", truck.display_name(), truck.id);
        Ok(truck)
    }

    /// Primera fase del borrado: no modifica nada
    pub async fn request_delete(&self, id: &str) -> AppResult<DeleteRequest> {
        let truck = self.get(id).await?;
        let requested_at = Utc::now();

        Ok(DeleteRequest {
            truck_id: truck.id.clone(),
            summary: truck.display_name(),
            has_photo: truck.photo_path.is_some(),
            requested_at,
            expires_at: requested_at + self.delete_ttl,
        })
    }

    /// Segunda fase del borrado: elimina el registro y después su foto
    pub async fn confirm_delete(&self, request: &DeleteRequest) -> AppResult<Truck> {
        if request.is_expired(Utc::now()) {
            warn!("⚠️ Confirmación de borrado vencida para {}", request.truck_id);
            return Err(AppError::BadRequest(
                "La confirmación de borrado expiró; solicítela de nuevo".to_string(),
            ));
        }

        let removed = self.trucks.delete_by_id(&request.truck_id).await?;
        if let Some(photo_path) = &removed.photo_path {
            self.photos.delete_if_exists(photo_path).await?;
        }

        info!("🗑️ Camión eliminado: {} ({})", removed.display_name(), removed.id);
        Ok(removed)
    }

    pub async fn list_available(&self, filters: &CatalogFilters) -> AppResult<Vec<CatalogEntry>> {
        let trucks = self.load_all().await?;
        Ok(catalog_service::list_available(&trucks, filters)
            .into_iter()
            .map(|t| catalog_service::to_entry(t, &self.photos, &self.whatsapp_number))
            .collect())
    }

    pub async fn list_inventory(&self, filters: &InventoryFilters) -> AppResult<Vec<Truck>> {
        let trucks = self.load_all().await?;
        Ok(catalog_service::list_inventory(&trucks, filters)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn filter_options(&self) -> AppResult<FilterOptions> {
        Ok(catalog_service::filter_options(&self.load_all().await?))
    }

    pub async fn inventory_filter_options(&self) -> AppResult<InventoryFilterOptions> {
        Ok(catalog_service::inventory_filter_options(&self.load_all().await?))
    }

    pub async fn summary(&self) -> AppResult<InventorySummary> {
        Ok(analytics_service::summarize(&self.load_all().await?))
    }

    pub async fn export(&self) -> AppResult<Vec<u8>> {
        transfer_service::export_all(&self.trucks).await
    }

    pub async fn import(&self, bytes: &[u8], dry_run: bool) -> AppResult<ImportOutcome> {
        transfer_service::import_all(&self.trucks, bytes, dry_run).await
    }
}

fn checked_photo(photo: UploadedPhoto) -> AppResult<(UploadedPhoto, String)> {
    let extension = validate_photo_extension(&photo.file_name).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("photo", e);
        AppError::Validation(errors)
    })?;

    if photo.bytes.is_empty() {
        return Err(AppError::BadRequest("La foto está vacía".to_string()));
    }
    Ok((photo, extension))
}

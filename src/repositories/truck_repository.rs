//! Repository de Truck
//!
//! Persistencia del inventario en un único archivo CSV. Cada lectura parte
//! del archivo en disco y cada escritura reescribe el archivo completo de
//! forma atómica.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::models::truck::Truck;
use crate::repositories::atomic_write_file;
use crate::repositories::csv_codec::{decode_records, encode_records, DecodeMode};
use crate::utils::errors::{not_found_error, store_write_error, AppError, AppResult};

/// Repository del archivo de inventario
#[derive(Debug, Clone)]
pub struct TruckRepository {
    csv_path: PathBuf,
}

impl TruckRepository {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Crea el directorio y un archivo solo con encabezado si no existe
    pub async fn ensure_initialized(&self) -> AppResult<()> {
        if let Some(parent) = self.csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| store_write_error(parent, e))?;
        }

        if fs::try_exists(&self.csv_path).await.unwrap_or(false) {
            return Ok(());
        }

        info!("📄 Creando archivo de inventario vacío en {}", self.csv_path.display());
        self.save_all(&[]).await
    }

    /// Carga todos los registros; un archivo ausente es un inventario vacío
    pub async fn load_all(&self) -> AppResult<Vec<Truck>> {
        let bytes = match fs::read(&self.csv_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::StoreCorrupt(format!(
                    "{}: {}",
                    self.csv_path.display(),
                    e
                )))
            }
        };

        let trucks = decode_records(&bytes, DecodeMode::Store)?;
        debug!("📖 {} camiones cargados desde {}", trucks.len(), self.csv_path.display());
        Ok(trucks)
    }

    /// Reemplaza el contenido completo del archivo
    pub async fn save_all(&self, trucks: &[Truck]) -> AppResult<()> {
        let bytes = encode_records(trucks)?;
        atomic_write_file(&self.csv_path, &bytes).await?;
        debug!("💾 {} camiones guardados en {}", trucks.len(), self.csv_path.display());
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Truck>> {
        Ok(self.load_all().await?.into_iter().find(|t| t.id == id))
    }

    /// Agrega un registro; el id no puede existir
    pub async fn insert(&self, truck: Truck) -> AppResult<Truck> {
        let mut trucks = self.load_all().await?;
        if trucks.iter().any(|t| t.id == truck.id) {
            return Err(AppError::DuplicateId(truck.id));
        }

        trucks.push(truck.clone());
        self.save_all(&trucks).await?;
        Ok(truck)
    }

    /// Reemplaza el registro con `id` conservando su posición
    pub async fn update_by_id(&self, id: &str, truck: Truck) -> AppResult<Truck> {
        self.update_with(id, move |current| {
            *current = Truck {
                id: current.id.clone(),
                ..truck
            };
        })
        .await
    }

    /// Modifica en sitio el registro con `id`
    pub async fn update_with<F>(&self, id: &str, change: F) -> AppResult<Truck>
    where
        F: FnOnce(&mut Truck),
    {
        let mut trucks = self.load_all().await?;
        let current = trucks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found_error("Truck", id))?;

        change(current);
        let updated = current.clone();

        self.save_all(&trucks).await?;
        Ok(updated)
    }

    /// Elimina el registro y lo devuelve
    pub async fn delete_by_id(&self, id: &str) -> AppResult<Truck> {
        let mut trucks = self.load_all().await?;
        let position = trucks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found_error("Truck", id))?;

        let removed = trucks.remove(position);
        self.save_all(&trucks).await?;
        Ok(removed)
    }

    /// Copia el archivo actual a `<archivo>.bak.<stamp>`
    ///
    /// Devuelve `None` si todavía no hay archivo que respaldar.
    pub async fn backup(&self, stamp: &str) -> AppResult<Option<PathBuf>> {
        if !fs::try_exists(&self.csv_path).await.unwrap_or(false) {
            return Ok(None);
        }

        let file_name = self
            .csv_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("inventory.csv");
        let backup_path = self
            .csv_path
            .with_file_name(format!("{}.bak.{}", file_name, stamp));

        fs::copy(&self.csv_path, &backup_path)
            .await
            .map_err(|e| store_write_error(&backup_path, e))?;

        info!("🗄️ Respaldo del inventario creado en {}", backup_path.display());
        Ok(Some(backup_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::truck::{Condition, SalesPerson, Transmission, TruckStatus, TruckType};
    use chrono::NaiveDate;

    fn truck(id: &str, brand: &str) -> Truck {
        Truck {
            id: id.to_string(),
            brand: brand.to_string(),
            model: "FH".to_string(),
            year: 2020,
            mileage: 100_000,
            truck_type: TruckType::Tractor,
            transmission: Transmission::Automated,
            engine: String::new(),
            features: String::new(),
            condition: Condition::Used,
            status: TruckStatus::Available,
            price: None,
            upload_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            sale_date: None,
            sales_person: SalesPerson::Rapha,
            photo_path: None,
        }
    }

    fn repository(dir: &tempfile::TempDir) -> TruckRepository {
        TruckRepository::new(dir.path().join("data").join("inventory.csv"))
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(repository(&dir).load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_initialized_writes_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        repo.ensure_initialized().await.unwrap();

        let text = std::fs::read_to_string(repo.csv_path()).unwrap();
        assert!(text.starts_with("id,brand,model,year"));
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        repo.ensure_initialized().await.unwrap();

        repo.insert(truck("a", "Volvo")).await.unwrap();
        let result = repo.insert(truck("a", "Scania")).await;
        assert!(matches!(result, Err(AppError::DuplicateId(_))));
        assert_eq!(repo.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_position_and_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        repo.ensure_initialized().await.unwrap();
        repo.insert(truck("a", "Volvo")).await.unwrap();
        repo.insert(truck("b", "Scania")).await.unwrap();

        repo.update_by_id("a", truck("other", "Mercedes")).await.unwrap();

        let trucks = repo.load_all().await.unwrap();
        assert_eq!(trucks[0].id, "a");
        assert_eq!(trucks[0].brand, "Mercedes");
        assert_eq!(trucks[1].id, "b");
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        repo.ensure_initialized().await.unwrap();

        let update = repo.update_with("missing", |t| t.brand.clear()).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));
        let delete = repo.delete_by_id("missing").await;
        assert!(matches!(delete, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_backup_copies_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        assert!(repo.backup("20240101120000").await.unwrap().is_none());

        repo.ensure_initialized().await.unwrap();
        repo.insert(truck("a", "Volvo")).await.unwrap();
        let backup = repo.backup("20240101120000").await.unwrap().unwrap();

        assert!(backup.ends_with("inventory.csv.bak.20240101120000"));
        assert_eq!(
            std::fs::read(&backup).unwrap(),
            std::fs::read(repo.csv_path()).unwrap()
        );
    }
}

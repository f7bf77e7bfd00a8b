//! Repository de fotos
//!
//! Fotos de camiones guardadas como `<images_dir>/<truck_id>.<ext>`.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::repositories::atomic_write_file;
use crate::utils::errors::{store_write_error, AppError, AppResult};
use crate::utils::validation::validate_truck_id;

/// Prefijo público bajo el que se sirven las fotos
pub const IMAGES_ROUTE: &str = "/images";

#[derive(Debug, Clone)]
pub struct PhotoRepository {
    images_dir: PathBuf,
}

impl PhotoRepository {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub async fn ensure_initialized(&self) -> AppResult<()> {
        fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| store_write_error(&self.images_dir, e))
    }

    /// Guarda la foto y devuelve la ruta almacenada en el registro
    pub async fn save(&self, bytes: &[u8], truck_id: &str, extension: &str) -> AppResult<String> {
        validate_truck_id(truck_id).map_err(|_| {
            AppError::BadRequest(format!("Id de camión inválido para una foto: '{}'", truck_id))
        })?;
        self.ensure_initialized().await?;
        let path = self.images_dir.join(format!("{}.{}", truck_id, extension));
        atomic_write_file(&path, bytes).await?;

        info!("🖼️ Foto guardada en {}", path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    /// Elimina la foto; que ya no exista no es un error
    ///
    /// Solo se borran archivos directamente dentro de `images_dir`; cualquier
    /// otra ruta se deja intacta.
    pub async fn delete_if_exists(&self, photo_path: &str) -> AppResult<()> {
        if !self.owns(Path::new(photo_path)) {
            warn!(
                "⚠️ Ruta de foto fuera de {}, no se borra: {}",
                self.images_dir.display(),
                photo_path
            );
            return Ok(());
        }

        match fs::remove_file(photo_path).await {
            Ok(()) => {
                info!("🗑️ Foto eliminada: {}", photo_path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("⚠️ La foto {} ya no existía", photo_path);
                Ok(())
            }
            Err(e) => Err(store_write_error(Path::new(photo_path), e)),
        }
    }

    /// La ruta es `<images_dir>/<archivo>`
    fn owns(&self, path: &Path) -> bool {
        let mut components = path.components();
        let file_is_plain = matches!(components.next_back(), Some(Component::Normal(_)));
        file_is_plain && components.as_path() == self.images_dir.as_path()
    }

    /// URL pública de una foto guardada (`/images/<archivo>`)
    pub fn public_url(&self, photo_path: &str) -> Option<String> {
        Path::new(photo_path)
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{}/{}", IMAGES_ROUTE, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_names_file_after_truck() {
        let dir = tempfile::tempdir().unwrap();
        let repo = PhotoRepository::new(dir.path().join("images"));

        let stored = repo.save(b"\xFF\xD8jpeg", "t-1", "jpg").await.unwrap();
        assert!(stored.ends_with("t-1.jpg"));
        assert_eq!(std::fs::read(&stored).unwrap(), b"\xFF\xD8jpeg");
        assert_eq!(repo.public_url(&stored).as_deref(), Some("/images/t-1.jpg"));
    }

    #[tokio::test]
    async fn test_delete_missing_photo_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let repo = PhotoRepository::new(dir.path());
        let missing = dir.path().join("nope.png");
        assert!(repo.delete_if_exists(missing.to_str().unwrap()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = PhotoRepository::new(dir.path());
        let stored = repo.save(b"png", "t-2", "png").await.unwrap();

        repo.delete_if_exists(&stored).await.unwrap();
        assert!(!Path::new(&stored).exists());
    }

    #[tokio::test]
    async fn test_save_rejects_ids_that_leave_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = PhotoRepository::new(dir.path().join("data").join("images"));

        let result = repo.save(b"jpeg", "../../escaped", "jpg").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(!dir.path().join("escaped.jpg").exists());
    }

    #[tokio::test]
    async fn test_delete_ignores_paths_outside_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let repo = PhotoRepository::new(&images);
        repo.ensure_initialized().await.unwrap();

        let outside = dir.path().join("inventory.csv");
        std::fs::write(&outside, "id\n").unwrap();
        let sneaky = images.join("..").join("inventory.csv");

        repo.delete_if_exists(outside.to_str().unwrap()).await.unwrap();
        repo.delete_if_exists(sneaky.to_str().unwrap()).await.unwrap();
        assert!(outside.exists());
    }
}

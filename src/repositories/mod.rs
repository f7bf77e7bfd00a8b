//! Repositories
//!
//! Este módulo contiene los repositorios de persistencia en disco:
//! el archivo CSV del inventario y el directorio de fotos.

pub mod csv_codec;
pub mod photo_repository;
pub mod truck_repository;

pub use photo_repository::PhotoRepository;
pub use truck_repository::TruckRepository;

use std::path::Path;

use tokio::{fs, io::AsyncWriteExt};

use crate::utils::errors::{store_write_error, AppResult};

/// Escribe `data` en un archivo temporal hermano y lo renombra sobre `final_path`
///
/// Un lector concurrente ve el archivo anterior completo o el nuevo completo.
pub(crate) async fn atomic_write_file(final_path: &Path, data: &[u8]) -> AppResult<()> {
    let file_name = final_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("inventory");
    let temp_path =
        final_path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4().simple()));

    let result = async {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, final_path).await
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path).await;
        return Err(store_write_error(final_path, e));
    }
    Ok(())
}

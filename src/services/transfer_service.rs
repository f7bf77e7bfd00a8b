//! Servicio de importación/exportación
//!
//! Lectura y escritura del inventario completo en un archivo CSV externo.
//! Antes de reemplazar el archivo de inventario se guarda una copia
//! `<archivo>.bak.<YYYYmmddHHMMSS>`.

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::models::truck::today;
use crate::repositories::csv_codec::{decode_records, encode_records, DecodeMode};
use crate::repositories::TruckRepository;
use crate::utils::errors::AppResult;

/// Nombre del archivo de exportación
pub const EXPORT_FILE_NAME: &str = "consulting_truck_inventory.csv";

/// Tipo MIME del archivo de exportación
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Resultado de una importación
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub record_count: usize,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
}

/// Serializa el inventario completo
pub async fn export_all(trucks: &TruckRepository) -> AppResult<Vec<u8>> {
    let records = trucks.load_all().await?;
    info!("📤 Exportando {} camiones", records.len());
    encode_records(&records)
}

/// Valida el archivo y, salvo en modo de prueba, respalda y reemplaza el inventario
///
/// Si el archivo no pasa la validación no se crea respaldo ni se modifica nada.
pub async fn import_all(
    trucks: &TruckRepository,
    bytes: &[u8],
    dry_run: bool,
) -> AppResult<ImportOutcome> {
    let records = decode_records(bytes, DecodeMode::Import { today: today() })?;

    if dry_run {
        info!("🔎 Importación de prueba: {} camiones válidos", records.len());
        return Ok(ImportOutcome {
            record_count: records.len(),
            dry_run: true,
            backup_path: None,
        });
    }

    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let backup = trucks.backup(&stamp).await?;
    trucks.save_all(&records).await?;

    info!("📥 Inventario reemplazado con {} camiones importados", records.len());
    Ok(ImportOutcome {
        record_count: records.len(),
        dry_run: false,
        backup_path: backup.map(|p| p.to_string_lossy().into_owned()),
    })
}

//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del inventario
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Inventory file is corrupt: {0}")]
    StoreCorrupt(String),

    #[error("Could not write inventory file: {0}")]
    StoreWrite(String),

    #[error("Duplicate truck id: {0}")]
    DuplicateId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Import file is missing required columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// Código HTTP asociado a cada tipo de error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::StoreCorrupt(_)
            | AppError::StoreWrite(_)
            | AppError::Hash(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DuplicateId(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SchemaMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        let error_response = match self {
            AppError::StoreCorrupt(msg) => ErrorResponse {
                error: "Store Corrupt".to_string(),
                message: "The inventory file could not be read; nothing was loaded".to_string(),
                details: Some(json!({ "store_error": msg })),
                code: Some("STORE_CORRUPT".to_string()),
            },

            AppError::StoreWrite(msg) => ErrorResponse {
                error: "Store Write Error".to_string(),
                message: "The inventory file could not be saved; changes were not committed"
                    .to_string(),
                details: Some(json!({ "io_error": msg })),
                code: Some("STORE_WRITE_ERROR".to_string()),
            },

            AppError::DuplicateId(id) => ErrorResponse {
                error: "Conflict".to_string(),
                message: format!("A truck with id '{}' already exists", id),
                details: None,
                code: Some("DUPLICATE_ID".to_string()),
            },

            AppError::NotFound(msg) => ErrorResponse {
                error: "Not Found".to_string(),
                message: format!("{}; the record no longer exists, reload", msg),
                details: None,
                code: Some("NOT_FOUND".to_string()),
            },

            AppError::SchemaMismatch { missing } => ErrorResponse {
                error: "Schema Mismatch".to_string(),
                message: "The file does not contain all required columns".to_string(),
                details: Some(json!({ "missing_columns": missing })),
                code: Some("SCHEMA_MISMATCH".to_string()),
            },

            AppError::Validation(e) => ErrorResponse {
                error: "Validation Error".to_string(),
                message: "The provided data is invalid".to_string(),
                details: Some(json!(e)),
                code: Some("VALIDATION_ERROR".to_string()),
            },

            AppError::Unauthorized(msg) => ErrorResponse {
                error: "Unauthorized".to_string(),
                message: msg,
                details: None,
                code: Some("UNAUTHORIZED".to_string()),
            },

            AppError::BadRequest(msg) => ErrorResponse {
                error: "Bad Request".to_string(),
                message: msg,
                details: None,
                code: Some("BAD_REQUEST".to_string()),
            },

            AppError::Jwt(msg) => ErrorResponse {
                error: "JWT Error".to_string(),
                message: msg,
                details: None,
                code: Some("JWT_ERROR".to_string()),
            },

            AppError::Hash(msg) => ErrorResponse {
                error: "Hash Error".to_string(),
                message: "An error occurred while processing credentials".to_string(),
                details: Some(json!({ "hash_error": msg })),
                code: Some("HASH_ERROR".to_string()),
            },

            AppError::Configuration(msg) => ErrorResponse {
                error: "Configuration Error".to_string(),
                message: msg,
                details: None,
                code: Some("CONFIGURATION_ERROR".to_string()),
            },

            AppError::Internal(msg) => ErrorResponse {
                error: "Internal Server Error".to_string(),
                message: "An unexpected error occurred".to_string(),
                details: Some(json!({ "internal_error": msg })),
                code: Some("INTERNAL_ERROR".to_string()),
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para errores de escritura del inventario
pub fn store_write_error(path: &std::path::Path, e: std::io::Error) -> AppError {
    AppError::StoreWrite(format!("{}: {}", path.display(), e))
}

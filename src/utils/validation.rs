//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de los datos
//! de camiones y de las fotos subidas.

use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::models::truck::max_truck_year;

/// Año mínimo aceptado para un camión
pub const MIN_TRUCK_YEAR: i32 = 1950;

/// Precio máximo aceptado (un billón)
pub const MAX_TRUCK_PRICE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Extensiones de foto aceptadas
pub const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Texto obligatorio: no vacío ni solo espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Año del camión entre 1950 y el año actual + 1
pub fn validate_truck_year(year: i32) -> Result<(), ValidationError> {
    validate_range(year, MIN_TRUCK_YEAR, max_truck_year())
}

/// Precio opcional, nunca negativo ni mayor a `MAX_TRUCK_PRICE`
pub fn validate_truck_price(price: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*price)?;
    if *price > MAX_TRUCK_PRICE {
        let mut error = ValidationError::new("max_price");
        error.add_param("max".into(), &MAX_TRUCK_PRICE);
        error.add_param("actual".into(), price);
        return Err(error);
    }
    Ok(())
}

/// Id de camión usable como nombre de archivo de foto
///
/// Sin separadores de ruta, sin `..` y sin caracteres de control.
pub fn validate_truck_id(id: &str) -> Result<(), ValidationError> {
    let unsafe_id = id.trim().is_empty()
        || id.contains("..")
        || id.chars().any(|c| c == '/' || c == '\\' || c.is_control());

    if unsafe_id {
        let mut error = ValidationError::new("truck_id");
        error.add_param("value".into(), &id.to_string());
        return Err(error);
    }
    Ok(())
}

/// Extrae y valida la extensión de una foto (`jpg`, `jpeg` o `png`)
///
/// Devuelve la extensión en minúsculas.
pub fn validate_photo_extension(file_name: &str) -> Result<String, ValidationError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(extension);
    }

    let mut error = ValidationError::new("photo_extension");
    error.add_param("value".into(), &file_name.to_string());
    error.add_param("allowed_values".into(), &PHOTO_EXTENSIONS.join(", "));
    Err(error)
}

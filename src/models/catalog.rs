//! Modelos del catálogo
//!
//! Filtros de consulta y entradas del catálogo público.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::truck::{TruckStatus, TruckType};

/// Valor que significa "sin restricción" en un filtro
pub const ANY_SENTINEL: &str = "Todos";

/// Filtro por igualdad sobre una dimensión
///
/// `"Todos"`, `"All"` o un valor vacío equivalen a `Any`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue<T> {
    Any,
    Only(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        FilterValue::Any
    }
}

impl<T: PartialEq> FilterValue<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            FilterValue::Any => true,
            FilterValue::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> FromStr for FilterValue<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty()
            || value.eq_ignore_ascii_case(ANY_SENTINEL)
            || value.eq_ignore_ascii_case("All")
        {
            return Ok(FilterValue::Any);
        }
        value
            .parse()
            .map(FilterValue::Only)
            .map_err(|_| format!("invalid filter value '{}'", value))
    }
}

impl<'de, T: FromStr> Deserialize<'de> for FilterValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Filtros del catálogo público
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilters {
    #[serde(default)]
    pub brand: FilterValue<String>,
    #[serde(default)]
    pub year: FilterValue<i32>,
    #[serde(default)]
    pub truck_type: FilterValue<TruckType>,
}

/// Filtros de la vista de administración
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryFilters {
    #[serde(default)]
    pub status: FilterValue<TruckStatus>,
    #[serde(default)]
    pub brand: FilterValue<String>,
    #[serde(default)]
    pub year: FilterValue<i32>,
}

/// Opción de un selector de filtro
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChoice {
    pub value: String,
    pub label: String,
}

impl FilterChoice {
    pub fn any() -> Self {
        Self {
            value: ANY_SENTINEL.to_string(),
            label: ANY_SENTINEL.to_string(),
        }
    }

    pub fn labeled(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    pub fn plain(value: impl ToString) -> Self {
        let value = value.to_string();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Valores disponibles para los filtros del catálogo
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub brands: Vec<FilterChoice>,
    pub years: Vec<FilterChoice>,
    pub truck_types: Vec<FilterChoice>,
}

/// Valores disponibles para los filtros de la vista de administración
#[derive(Debug, Clone, Serialize)]
pub struct InventoryFilterOptions {
    pub statuses: Vec<FilterChoice>,
    pub brands: Vec<FilterChoice>,
    pub years: Vec<FilterChoice>,
}

/// Camión tal como se muestra en el catálogo público
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub mileage: u64,
    pub truck_type: TruckType,
    pub truck_type_label: &'static str,
    pub transmission_label: &'static str,
    pub condition_label: &'static str,
    pub engine: String,
    pub features: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub whatsapp_url: String,
}

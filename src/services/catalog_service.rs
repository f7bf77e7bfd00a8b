//! Servicio de catálogo
//!
//! Consultas de solo lectura sobre el conjunto de registros: el catálogo
//! público (solo camiones disponibles), la vista de administración y los
//! valores de los selectores de filtro. El orden de salida es siempre el
//! orden del archivo.

use std::collections::{BTreeMap, BTreeSet};

use base64::{engine::general_purpose::URL_SAFE, Engine as _};

use crate::models::catalog::{
    CatalogEntry, CatalogFilters, FilterChoice, FilterOptions, InventoryFilterOptions,
    InventoryFilters,
};
use crate::models::truck::{Truck, TruckStatus};
use crate::repositories::PhotoRepository;

/// Camiones disponibles que cumplen los filtros
pub fn list_available<'a>(trucks: &'a [Truck], filters: &CatalogFilters) -> Vec<&'a Truck> {
    trucks
        .iter()
        .filter(|t| t.is_available())
        .filter(|t| filters.brand.matches(&t.brand))
        .filter(|t| filters.year.matches(&t.year))
        .filter(|t| filters.truck_type.matches(&t.truck_type))
        .collect()
}

/// Todos los camiones que cumplen los filtros de administración
pub fn list_inventory<'a>(trucks: &'a [Truck], filters: &InventoryFilters) -> Vec<&'a Truck> {
    trucks
        .iter()
        .filter(|t| filters.status.matches(&t.status))
        .filter(|t| filters.brand.matches(&t.brand))
        .filter(|t| filters.year.matches(&t.year))
        .collect()
}

/// Marcas (ascendente), años (descendente) y tipos de los camiones disponibles
pub fn filter_options(trucks: &[Truck]) -> FilterOptions {
    let available: Vec<&Truck> = trucks.iter().filter(|t| t.is_available()).collect();

    let brands: BTreeSet<&str> = available.iter().map(|t| t.brand.as_str()).collect();
    let years: BTreeSet<i32> = available.iter().map(|t| t.year).collect();
    let types: BTreeMap<&str, _> = available
        .iter()
        .map(|t| (t.truck_type.code(), t.truck_type))
        .collect();

    FilterOptions {
        brands: with_any(brands.into_iter().map(FilterChoice::plain)),
        years: with_any(years.into_iter().rev().map(FilterChoice::plain)),
        truck_types: with_any(
            types
                .into_values()
                .map(|t| FilterChoice::labeled(t.code(), t.label())),
        ),
    }
}

/// Estados, marcas y años de todo el inventario para la vista de administración
pub fn inventory_filter_options(trucks: &[Truck]) -> InventoryFilterOptions {
    let statuses: BTreeSet<TruckStatus> = trucks.iter().map(|t| t.status).collect();
    let brands: BTreeSet<&str> = trucks.iter().map(|t| t.brand.as_str()).collect();
    let years: BTreeSet<i32> = trucks.iter().map(|t| t.year).collect();

    InventoryFilterOptions {
        statuses: with_any(
            statuses
                .into_iter()
                .map(|s| FilterChoice::labeled(s.code(), s.label())),
        ),
        brands: with_any(brands.into_iter().map(FilterChoice::plain)),
        years: with_any(years.into_iter().rev().map(FilterChoice::plain)),
    }
}

fn with_any(choices: impl Iterator<Item = FilterChoice>) -> Vec<FilterChoice> {
    std::iter::once(FilterChoice::any()).chain(choices).collect()
}

/// Enlace de contacto por WhatsApp para un camión
pub fn whatsapp_url(truck: &Truck, number: &str) -> String {
    let message = format!(
        "Olá! Estou interessado no caminhão {} {} ({}) que vi no catálogo da Consulting Truck. Poderia me fornecer mais informações?",
        truck.brand, truck.model, truck.year
    );
    format!("https://wa.me/{}?text={}", number, URL_SAFE.encode(message))
}

/// Convierte un registro a su forma pública
pub fn to_entry(truck: &Truck, photos: &PhotoRepository, whatsapp_number: &str) -> CatalogEntry {
    CatalogEntry {
        id: truck.id.clone(),
        brand: truck.brand.clone(),
        model: truck.model.clone(),
        year: truck.year,
        mileage: truck.mileage,
        truck_type: truck.truck_type,
        truck_type_label: truck.truck_type.label(),
        transmission_label: truck.transmission.label(),
        condition_label: truck.condition.label(),
        engine: truck.engine.clone(),
        features: truck.features.clone(),
        price: truck.listed_price(),
        photo_url: truck
            .photo_path
            .as_deref()
            .and_then(|path| photos.public_url(path)),
        whatsapp_url: whatsapp_url(truck, whatsapp_number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::FilterValue;
    use crate::models::truck::{Condition, SalesPerson, Transmission, TruckType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn truck(id: &str, brand: &str, year: i32, truck_type: TruckType, status: TruckStatus) -> Truck {
        Truck {
            id: id.to_string(),
            brand: brand.to_string(),
            model: "M".to_string(),
            year,
            mileage: 0,
            truck_type,
            transmission: Transmission::Manual,
            engine: String::new(),
            features: String::new(),
            condition: Condition::Used,
            status,
            price: None,
            upload_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            sale_date: None,
            sales_person: SalesPerson::Rapha,
            photo_path: None,
        }
    }

    fn fleet() -> Vec<Truck> {
        vec![
            truck("1", "Volvo", 2020, TruckType::Tractor, TruckStatus::Available),
            truck("2", "Scania", 2018, TruckType::Truck, TruckStatus::Sold),
            truck("3", "Mercedes", 2021, TruckType::BoxTruck, TruckStatus::Available),
            truck("4", "Volvo", 2018, TruckType::Tractor, TruckStatus::Reserved),
            truck("5", "Volvo", 2018, TruckType::BiTruck, TruckStatus::Available),
        ]
    }

    #[test]
    fn test_list_available_never_returns_other_statuses() {
        let trucks = fleet();
        let brands = [FilterValue::Any, FilterValue::Only("Volvo".to_string())];
        let years = [FilterValue::Any, FilterValue::Only(2018)];
        let types = [FilterValue::Any, FilterValue::Only(TruckType::Tractor)];

        for brand in &brands {
            for year in &years {
                for truck_type in &types {
                    let filters = CatalogFilters {
                        brand: brand.clone(),
                        year: year.clone(),
                        truck_type: truck_type.clone(),
                    };
                    assert!(list_available(&trucks, &filters)
                        .iter()
                        .all(|t| t.status == TruckStatus::Available));
                }
            }
        }
    }

    #[test]
    fn test_list_available_keeps_file_order() {
        let trucks = fleet();
        let ids: Vec<&str> = list_available(&trucks, &CatalogFilters::default())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3", "5"]);

        let filters = CatalogFilters {
            brand: FilterValue::Only("Volvo".to_string()),
            year: FilterValue::Only(2018),
            ..Default::default()
        };
        let ids: Vec<&str> = list_available(&trucks, &filters)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["5"]);
    }

    #[test]
    fn test_list_inventory_filters_by_status() {
        let trucks = fleet();
        let filters = InventoryFilters {
            status: FilterValue::Only(TruckStatus::Sold),
            ..Default::default()
        };
        let found = list_inventory(&trucks, &filters);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "2");
        assert_eq!(list_inventory(&trucks, &InventoryFilters::default()).len(), 5);
    }

    #[test]
    fn test_filter_options_sorted_and_led_by_any() {
        let options = filter_options(&fleet());
        let brands: Vec<&str> = options.brands.iter().map(|c| c.value.as_str()).collect();
        let years: Vec<&str> = options.years.iter().map(|c| c.value.as_str()).collect();
        let types: Vec<&str> = options.truck_types.iter().map(|c| c.value.as_str()).collect();

        assert_eq!(brands, vec!["Todos", "Mercedes", "Volvo"]);
        assert_eq!(years, vec!["Todos", "2021", "2020", "2018"]);
        assert_eq!(types, vec!["Todos", "bi-truck", "box-truck", "tractor"]);
        assert_eq!(options.truck_types[2].label, "Toco");
    }

    #[test]
    fn test_inventory_filter_options_use_all_records() {
        let options = inventory_filter_options(&fleet());
        let statuses: Vec<&str> = options.statuses.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(statuses, vec!["Todos", "available", "sold", "reserved"]);
        assert_eq!(options.brands.len(), 4);
    }

    #[test]
    fn test_whatsapp_url_is_url_safe_base64() {
        let truck = truck("1", "Volvo", 2020, TruckType::Tractor, TruckStatus::Available);
        let url = whatsapp_url(&truck, "5541995400112");
        let encoded = url
            .strip_prefix("https://wa.me/5541995400112?text=")
            .unwrap();
        let decoded = String::from_utf8(URL_SAFE.decode(encoded).unwrap()).unwrap();
        assert!(decoded.contains("caminhão Volvo M (2020)"));
        assert!(!encoded.contains('+') && !encoded.contains('/'));
    }

    #[test]
    fn test_entry_hides_unlisted_price() {
        let photos = PhotoRepository::new("data/images");
        let mut t = truck("1", "Volvo", 2020, TruckType::Tractor, TruckStatus::Available);
        t.price = Some(Decimal::ZERO);
        t.photo_path = Some("data/images/1.png".to_string());

        let entry = to_entry(&t, &photos, "5541995400112");
        assert!(entry.price.is_none());
        assert_eq!(entry.photo_url.as_deref(), Some("/images/1.png"));
        assert_eq!(entry.truck_type_label, "Cavalo Mecânico");
    }
}

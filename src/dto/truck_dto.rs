use serde::{Deserialize, Serialize};

use crate::models::truck::Truck;
use crate::repositories::PhotoRepository;

// Camión con etiquetas y URL de foto para la vista de administración
#[derive(Debug, Serialize)]
pub struct TruckResponse {
    #[serde(flatten)]
    pub truck: Truck,
    pub truck_type_label: &'static str,
    pub transmission_label: &'static str,
    pub condition_label: &'static str,
    pub status_label: &'static str,
    pub sales_person_label: &'static str,
    pub photo_url: Option<String>,
}

impl TruckResponse {
    pub fn new(truck: Truck, photos: &PhotoRepository) -> Self {
        Self {
            truck_type_label: truck.truck_type.label(),
            transmission_label: truck.transmission.label(),
            condition_label: truck.condition.label(),
            status_label: truck.status.label(),
            sales_person_label: truck.sales_person.label(),
            photo_url: truck
                .photo_path
                .as_deref()
                .and_then(|path| photos.public_url(path)),
            truck,
        }
    }
}

// Query de importación
#[derive(Debug, Default, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub dry_run: bool,
}

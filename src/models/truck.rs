//! Modelo de Truck
//!
//! Este módulo contiene el registro de camión del inventario, sus enums de
//! dominio y el formulario validado de alta/edición.
//!
//! Los enums se guardan en el archivo con un código estable (`box-truck`,
//! `available`, ...) y aceptan también la etiqueta en portugués con la que
//! el inventario anterior escribía sus archivos (`Toco`, `Disponível`, ...).

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_not_blank, validate_truck_price, validate_truck_year};

/// Declara un enum con código de archivo y etiqueta de pantalla.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Código usado en el archivo CSV y en la API
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Etiqueta en portugués para la capa de presentación
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.code() == value || v.label().to_lowercase() == value)
                    .ok_or_else(|| format!("unknown {} '{}'", stringify!($name), s.trim()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

labeled_enum! {
    /// Tipo de camión
    TruckType {
        Tractor => ("tractor", "Cavalo Mecânico"),
        Truck => ("truck", "Truck"),
        BoxTruck => ("box-truck", "Toco"),
        BiTruck => ("bi-truck", "Bitruck"),
        LightCommercial => ("light-commercial", "VUC"),
        Other => ("other", "Outro"),
    }
}

labeled_enum! {
    /// Transmisión
    Transmission {
        Manual => ("manual", "Manual"),
        Automatic => ("automatic", "Automática"),
        Automated => ("automated", "Automatizada"),
    }
}

labeled_enum! {
    /// Condición del vehículo
    Condition {
        New => ("new", "Novo"),
        UsedLikeNew => ("used-like-new", "Seminovo"),
        Used => ("used", "Usado"),
    }
}

labeled_enum! {
    /// Estado del camión - define la visibilidad en el catálogo
    TruckStatus {
        Available => ("available", "Disponível"),
        Sold => ("sold", "Vendido"),
        InMaintenance => ("in-maintenance", "Em Manutenção"),
        Reserved => ("reserved", "Reservado"),
    }
}

labeled_enum! {
    /// Vendedores de la concesionaria
    SalesPerson {
        Rapha => ("rapha", "Rapha"),
        Seller2 => ("vendedor-2", "Vendedor 2"),
        Seller3 => ("vendedor-3", "Vendedor 3"),
    }
}

/// Registro de camión - una fila del archivo de inventario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub mileage: u64,
    pub truck_type: TruckType,
    pub transmission: Transmission,
    pub engine: String,
    pub features: String,
    pub condition: Condition,
    pub status: TruckStatus,
    pub price: Option<Decimal>,
    pub upload_date: NaiveDate,
    pub sale_date: Option<NaiveDate>,
    pub sales_person: SalesPerson,
    pub photo_path: Option<String>,
}

impl Truck {
    pub fn is_available(&self) -> bool {
        self.status == TruckStatus::Available
    }

    pub fn is_sold(&self) -> bool {
        self.status == TruckStatus::Sold
    }

    /// Precio publicado: nulo o cero significa "sin precio"
    pub fn listed_price(&self) -> Option<Decimal> {
        self.price.filter(|price| *price > Decimal::ZERO)
    }

    /// Nombre para mostrar, p.ej. "Volvo FH (2020)"
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.year)
    }

    pub fn mark_sold(&mut self, today: NaiveDate) {
        self.status = TruckStatus::Sold;
        self.sale_date = Some(today);
    }

    pub fn mark_available(&mut self) {
        self.status = TruckStatus::Available;
        self.sale_date = None;
    }

    /// `sale_date` existe si y solo si el estado es vendido.
    pub fn enforce_sale_date(&mut self, today: NaiveDate) {
        if self.is_sold() {
            self.sale_date.get_or_insert(today);
        } else {
            self.sale_date = None;
        }
    }
}

/// Genera un identificador nuevo para un camión
pub fn new_truck_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fecha local de hoy
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Año máximo aceptado por el formulario (año actual + 1)
pub fn max_truck_year() -> i32 {
    today().year() + 1
}

/// Formulario validado de alta/edición
///
/// Sin `id` se crea un camión nuevo; con `id` se edita en sitio.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TruckForm {
    #[serde(default)]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub brand: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,

    #[validate(custom = "validate_truck_year")]
    pub year: i32,

    #[serde(default)]
    pub mileage: u64,

    pub truck_type: TruckType,
    pub transmission: Transmission,

    #[serde(default)]
    pub engine: String,

    #[serde(default)]
    pub features: String,

    pub condition: Condition,

    #[serde(default = "default_status")]
    pub status: TruckStatus,

    #[serde(default)]
    #[validate(custom = "validate_truck_price")]
    pub price: Option<Decimal>,

    pub sales_person: SalesPerson,

    /// Sobrescribe la fecha de alta al editar
    #[serde(default)]
    pub upload_date: Option<NaiveDate>,

    /// Sobrescribe la fecha de venta al editar
    #[serde(default)]
    pub sale_date: Option<NaiveDate>,
}

fn default_status() -> TruckStatus {
    TruckStatus::Available
}

impl TruckForm {
    /// Quita los espacios de los extremos de marca y modelo
    pub fn normalize(&mut self) {
        self.brand = self.brand.trim().to_string();
        self.model = self.model.trim().to_string();
    }

    /// Construye un registro nuevo con fecha de alta de hoy
    pub fn into_new_truck(self, id: String, today: NaiveDate) -> Truck {
        let mut truck = Truck {
            id,
            brand: self.brand,
            model: self.model,
            year: self.year,
            mileage: self.mileage,
            truck_type: self.truck_type,
            transmission: self.transmission,
            engine: self.engine,
            features: self.features,
            condition: self.condition,
            status: self.status,
            price: self.price,
            upload_date: today,
            sale_date: self.sale_date,
            sales_person: self.sales_person,
            photo_path: None,
        };
        truck.enforce_sale_date(today);
        truck
    }

    /// Aplica el formulario sobre un registro existente
    ///
    /// `upload_date` y `sale_date` se conservan salvo que el formulario
    /// los sobrescriba explícitamente.
    pub fn apply_to(self, current: Truck, today: NaiveDate) -> Truck {
        let mut truck = Truck {
            id: current.id,
            brand: self.brand,
            model: self.model,
            year: self.year,
            mileage: self.mileage,
            truck_type: self.truck_type,
            transmission: self.transmission,
            engine: self.engine,
            features: self.features,
            condition: self.condition,
            status: self.status,
            price: self.price,
            upload_date: self.upload_date.unwrap_or(current.upload_date),
            sale_date: self.sale_date.or(current.sale_date),
            sales_person: self.sales_person,
            photo_path: current.photo_path,
        };
        truck.enforce_sale_date(today);
        truck
    }
}

/// Foto subida desde el formulario
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

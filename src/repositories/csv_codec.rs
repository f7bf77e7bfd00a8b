//! Codec CSV del inventario
//!
//! Una fila por camión, con encabezado. El mismo formato sirve para el
//! archivo de inventario y para los archivos de exportación/importación.
//! Los enums se escriben con su código y se leen por código o por etiqueta.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::truck::{Condition, SalesPerson, Transmission, Truck, TruckStatus, TruckType};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_truck_id, validate_truck_price};

/// Columnas del archivo, en orden
pub const HEADERS: [&str; 16] = [
    "id",
    "brand",
    "model",
    "year",
    "mileage",
    "truck_type",
    "transmission",
    "engine",
    "features",
    "condition",
    "status",
    "price",
    "upload_date",
    "sale_date",
    "sales_person",
    "photo_path",
];

/// Columnas sin las cuales un archivo de importación se rechaza
pub const REQUIRED_COLUMNS: [&str; 5] = ["id", "brand", "model", "year", "status"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cómo tratar columnas y valores ausentes
#[derive(Debug, Clone, Copy)]
pub enum DecodeMode {
    /// Archivo propio del inventario: todo debe estar presente
    Store,
    /// Archivo de importación: se aplican valores por defecto
    Import { today: NaiveDate },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TruckRow {
    id: Option<String>,
    brand: Option<String>,
    model: Option<String>,
    year: Option<String>,
    mileage: Option<String>,
    truck_type: Option<String>,
    transmission: Option<String>,
    engine: Option<String>,
    features: Option<String>,
    condition: Option<String>,
    status: Option<String>,
    price: Option<String>,
    upload_date: Option<String>,
    sale_date: Option<String>,
    sales_person: Option<String>,
    photo_path: Option<String>,
}

/// Serializa los registros a bytes CSV (encabezado incluido)
pub fn encode_records(trucks: &[Truck]) -> AppResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(HEADERS).map_err(csv_write_error)?;

    for truck in trucks {
        writer
            .write_record([
                truck.id.clone(),
                truck.brand.clone(),
                truck.model.clone(),
                truck.year.to_string(),
                truck.mileage.to_string(),
                truck.truck_type.code().to_string(),
                truck.transmission.code().to_string(),
                truck.engine.clone(),
                truck.features.clone(),
                truck.condition.code().to_string(),
                truck.status.code().to_string(),
                truck.price.map(|p| p.to_string()).unwrap_or_default(),
                truck.upload_date.format(DATE_FORMAT).to_string(),
                truck
                    .sale_date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
                truck.sales_person.code().to_string(),
                truck.photo_path.clone().unwrap_or_default(),
            ])
            .map_err(csv_write_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV buffer error: {}", e)))
}

/// Decodifica bytes CSV a registros
///
/// En modo `Store` un archivo vacío es un inventario vacío y cualquier
/// problema es `StoreCorrupt`. En modo `Import` faltar una columna requerida
/// es `SchemaMismatch` y un valor inválido es `BadRequest` con su línea.
pub fn decode_records(bytes: &[u8], mode: DecodeMode) -> AppResult<Vec<Truck>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return match mode {
            DecodeMode::Store => Ok(Vec::new()),
            DecodeMode::Import { .. } => Err(AppError::SchemaMismatch {
                missing: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            }),
        };
    }

    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(bytes);

    let headers = normalize_headers(
        reader
            .headers()
            .map_err(|e| malformed(mode, format!("header: {}", e)))?,
    );
    check_columns(&headers, mode)?;
    reader.set_headers(headers.clone());

    let mut trucks = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let record = result.map_err(|e| malformed(mode, e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        let row: TruckRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(mode, format!("line {}: {}", line, e)))?;
        let truck = row_to_truck(row, line, mode)?;

        if !seen.insert(truck.id.clone()) {
            return Err(match mode {
                DecodeMode::Store => AppError::StoreCorrupt(format!(
                    "line {}: id '{}' appears more than once",
                    line, truck.id
                )),
                DecodeMode::Import { .. } => AppError::DuplicateId(truck.id),
            });
        }
        trucks.push(truck);
    }

    Ok(trucks)
}

fn normalize_headers(raw: &StringRecord) -> StringRecord {
    raw.iter()
        .map(|h| {
            let name = h.trim().to_lowercase();
            if name == "truck_id" {
                "id".to_string()
            } else {
                name
            }
        })
        .collect()
}

fn check_columns(headers: &StringRecord, mode: DecodeMode) -> AppResult<()> {
    let present: HashSet<&str> = headers.iter().collect();
    let expected: &[&str] = match mode {
        DecodeMode::Store => &HEADERS,
        DecodeMode::Import { .. } => &REQUIRED_COLUMNS,
    };
    let missing: Vec<String> = expected
        .iter()
        .filter(|c| !present.contains(**c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    Err(match mode {
        DecodeMode::Store => {
            AppError::StoreCorrupt(format!("missing columns: {}", missing.join(", ")))
        }
        DecodeMode::Import { .. } => AppError::SchemaMismatch { missing },
    })
}

fn row_to_truck(row: TruckRow, line: u64, mode: DecodeMode) -> AppResult<Truck> {
    let ctx = RowContext { line, mode };

    let id = ctx.required("id", row.id)?;
    validate_truck_id(&id).map_err(|_| ctx.invalid("id"))?;
    let brand = ctx.required("brand", row.brand)?;
    let model = ctx.required("model", row.model)?;
    let year = parse_year(&ctx.required("year", row.year)?).ok_or_else(|| ctx.invalid("year"))?;
    let status: TruckStatus = ctx.parse("status", ctx.required("status", row.status)?)?;

    let mileage = match non_empty(row.mileage) {
        Some(raw) => parse_mileage(&raw).ok_or_else(|| ctx.invalid("mileage"))?,
        None => ctx.defaulted("mileage", 0)?,
    };
    let truck_type = ctx.enum_or("truck_type", row.truck_type, TruckType::Other)?;
    let transmission = ctx.enum_or("transmission", row.transmission, Transmission::Manual)?;
    let condition = ctx.enum_or("condition", row.condition, Condition::Used)?;
    let sales_person = ctx.enum_or("sales_person", row.sales_person, SalesPerson::ALL[0])?;

    let price = match non_empty(row.price) {
        Some(raw) => {
            let price = Decimal::from_str(&raw).map_err(|_| ctx.invalid("price"))?;
            validate_truck_price(&price).map_err(|_| ctx.invalid("price"))?;
            Some(price)
        }
        None => None,
    };
    let upload_date = match non_empty(row.upload_date) {
        Some(raw) => parse_date(&raw).ok_or_else(|| ctx.invalid("upload_date"))?,
        None => match mode {
            DecodeMode::Store => return Err(ctx.missing("upload_date")),
            DecodeMode::Import { today } => today,
        },
    };
    let sale_date = match non_empty(row.sale_date) {
        Some(raw) => Some(parse_date(&raw).ok_or_else(|| ctx.invalid("sale_date"))?),
        None => None,
    };

    Ok(Truck {
        id,
        brand,
        model,
        year,
        mileage,
        truck_type,
        transmission,
        engine: row.engine.unwrap_or_default(),
        features: row.features.unwrap_or_default(),
        condition,
        status,
        price,
        upload_date,
        sale_date,
        sales_person,
        photo_path: non_empty(row.photo_path),
    })
}

struct RowContext {
    line: u64,
    mode: DecodeMode,
}

impl RowContext {
    fn required(&self, field: &str, value: Option<String>) -> AppResult<String> {
        non_empty(value).ok_or_else(|| self.missing(field))
    }

    fn parse<T: FromStr>(&self, field: &str, raw: String) -> AppResult<T> {
        raw.parse().map_err(|_| self.invalid(field))
    }

    fn enum_or<T: FromStr>(&self, field: &str, value: Option<String>, default: T) -> AppResult<T> {
        match non_empty(value) {
            Some(raw) => self.parse(field, raw),
            None => self.defaulted(field, default),
        }
    }

    fn defaulted<T>(&self, field: &str, default: T) -> AppResult<T> {
        match self.mode {
            DecodeMode::Store => Err(self.missing(field)),
            DecodeMode::Import { .. } => Ok(default),
        }
    }

    fn missing(&self, field: &str) -> AppError {
        self.error(format!("line {}: missing value for '{}'", self.line, field))
    }

    fn invalid(&self, field: &str) -> AppError {
        self.error(format!("line {}: invalid value for '{}'", self.line, field))
    }

    fn error(&self, message: String) -> AppError {
        malformed(self.mode, message)
    }
}

fn malformed(mode: DecodeMode, message: String) -> AppError {
    match mode {
        DecodeMode::Store => AppError::StoreCorrupt(message),
        DecodeMode::Import { .. } => AppError::BadRequest(message),
    }
}

fn csv_write_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("CSV encode error: {}", e))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_year(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i32)
    })
}

fn parse_mileage(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u64)
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Truck {
        Truck {
            id: "a1".to_string(),
            brand: "Volvo".to_string(),
            model: "FH, 540".to_string(),
            year: 2020,
            mileage: 150_000,
            truck_type: TruckType::Tractor,
            transmission: Transmission::Automated,
            engine: "D13".to_string(),
            features: "Ar \"digital\"\nGeladeira".to_string(),
            condition: Condition::UsedLikeNew,
            status: TruckStatus::Sold,
            price: Some(Decimal::from_str("350.50").unwrap()),
            upload_date: date(2024, 1, 10),
            sale_date: Some(date(2024, 2, 1)),
            sales_person: SalesPerson::Seller2,
            photo_path: Some("data/images/a1.jpg".to_string()),
        }
    }

    #[test]
    fn test_encode_then_decode_preserves_quoted_fields_and_price_scale() {
        let bytes = encode_records(&[sample()]).unwrap();
        let decoded = decode_records(&bytes, DecodeMode::Store).unwrap();
        assert_eq!(decoded, vec![sample()]);
        assert_eq!(decoded[0].price.unwrap().to_string(), "350.50");
    }

    #[test]
    fn test_encode_writes_header_first() {
        let bytes = encode_records(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim_end(), HEADERS.join(","));
    }

    #[test]
    fn test_empty_store_decodes_to_no_records() {
        assert!(decode_records(b"", DecodeMode::Store).unwrap().is_empty());
        let header_only = format!("{}\n", HEADERS.join(","));
        assert!(decode_records(header_only.as_bytes(), DecodeMode::Store)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_store_missing_column_is_corrupt() {
        let result = decode_records(b"id,brand\nx,Volvo\n", DecodeMode::Store);
        assert!(matches!(result, Err(AppError::StoreCorrupt(_))));
    }

    #[test]
    fn test_import_reports_missing_required_columns() {
        let mode = DecodeMode::Import { today: date(2024, 5, 1) };
        let result = decode_records(b"id,brand,model,year\nx,Volvo,FH,2020\n", mode);
        match result {
            Err(AppError::SchemaMismatch { missing }) => assert_eq!(missing, vec!["status"]),
            other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_import_applies_defaults_and_accepts_labels() {
        let mode = DecodeMode::Import { today: date(2024, 5, 1) };
        let csv = "truck_id,Brand,model,year,status\nx1,Scania,R450,2019,Disponível\n";
        let trucks = decode_records(csv.as_bytes(), mode).unwrap();

        assert_eq!(trucks.len(), 1);
        let truck = &trucks[0];
        assert_eq!(truck.id, "x1");
        assert_eq!(truck.brand, "Scania");
        assert_eq!(truck.status, TruckStatus::Available);
        assert_eq!(truck.mileage, 0);
        assert_eq!(truck.truck_type, TruckType::Other);
        assert_eq!(truck.transmission, Transmission::Manual);
        assert_eq!(truck.condition, Condition::Used);
        assert_eq!(truck.sales_person, SalesPerson::Rapha);
        assert_eq!(truck.upload_date, date(2024, 5, 1));
        assert_eq!(truck.price, None);
        assert_eq!(truck.photo_path, None);
    }

    #[test]
    fn test_import_rejects_duplicate_ids() {
        let mode = DecodeMode::Import { today: date(2024, 5, 1) };
        let csv = "id,brand,model,year,status\nx,Volvo,FH,2020,available\nx,Volvo,FM,2021,sold\n";
        let result = decode_records(csv.as_bytes(), mode);
        assert!(matches!(result, Err(AppError::DuplicateId(id)) if id == "x"));
    }

    #[test]
    fn test_import_invalid_value_names_line() {
        let mode = DecodeMode::Import { today: date(2024, 5, 1) };
        let csv = "id,brand,model,year,status\nx,Volvo,FH,2020,available\ny,Volvo,FM,dois mil,sold\n";
        match decode_records(csv.as_bytes(), mode) {
            Err(AppError::BadRequest(message)) => assert!(message.contains("line 3")),
            other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_bom_is_ignored() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend(encode_records(&[sample()]).unwrap());
        assert_eq!(decode_records(&bytes, DecodeMode::Store).unwrap().len(), 1);
    }

    #[test]
    fn test_free_text_keeps_surrounding_whitespace() {
        let mut truck = sample();
        truck.engine = "  D13 540cv ".to_string();
        truck.features = "  Cabine leito\nAr\n".to_string();

        let bytes = encode_records(&[truck.clone()]).unwrap();
        let decoded = decode_records(&bytes, DecodeMode::Store).unwrap();
        assert_eq!(decoded, vec![truck]);
        assert_eq!(encode_records(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_padded_header_and_values_still_import() {
        let mode = DecodeMode::Import { today: date(2024, 5, 1) };
        let csv = " id , brand ,model,year,status\nx1, Scania ,R450, 2019 , Disponível \n";
        let trucks = decode_records(csv.as_bytes(), mode).unwrap();
        assert_eq!(trucks[0].brand, "Scania");
        assert_eq!(trucks[0].year, 2019);
        assert_eq!(trucks[0].status, TruckStatus::Available);
    }

    #[test]
    fn test_import_rejects_ids_that_are_paths() {
        let mode = DecodeMode::Import { today: date(2024, 5, 1) };
        for id in ["../../escaped", "fotos/x1", "..", "a\\b"] {
            let csv = format!("id,brand,model,year,status\n{},Volvo,FH,2020,available\n", id);
            match decode_records(csv.as_bytes(), mode) {
                Err(AppError::BadRequest(message)) => assert!(message.contains("'id'")),
                other => panic!("id {} accepted: {:?}", id, other.map(|t| t.len())),
            }
        }
    }

    #[test]
    fn test_import_rejects_out_of_range_price() {
        let mode = DecodeMode::Import { today: date(2024, 5, 1) };
        let csv = format!(
            "id,brand,model,year,status,price\nx,Volvo,FH,2020,sold,{}\n",
            Decimal::MAX
        );
        match decode_records(csv.as_bytes(), mode) {
            Err(AppError::BadRequest(message)) => assert!(message.contains("'price'")),
            other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
        }
    }
}

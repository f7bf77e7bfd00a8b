//! Modelos de Analytics
//!
//! Este módulo contiene los agregados del inventario para el dashboard.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::truck::{SalesPerson, TruckStatus};

/// Cantidad de camiones en un estado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: TruckStatus,
    pub label: &'static str,
    pub count: usize,
}

/// Cantidad por grupo (marca o estado) para gráficos de distribución
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
}

/// Ventas de un mes (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    pub month: String,
    pub count: usize,
    pub total: Decimal,
}

/// Ventas de un vendedor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorSales {
    pub sales_person: SalesPerson,
    pub label: &'static str,
    pub count: usize,
    pub total: Decimal,
}

/// Resumen para dashboard
#[derive(Debug, Clone, Serialize)]
pub struct InventorySummary {
    pub total: usize,
    pub available: usize,
    pub sold: usize,
    pub total_sale_value: Decimal,
    pub count_by_status: Vec<StatusCount>,
    pub brand_distribution: Vec<GroupCount>,
    pub status_distribution: Vec<GroupCount>,
    /// Ausente si ningún camión vendido tiene fecha de venta
    pub monthly_sales: Option<Vec<MonthlySales>>,
    pub vendor_sales: Vec<VendorSales>,
}

//! Servicio de analytics
//!
//! Funciones puras sobre el conjunto de registros para el dashboard:
//! totales, conteos por estado, distribuciones y ventas por mes y vendedor.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::models::analytics::{
    GroupCount, InventorySummary, MonthlySales, StatusCount, VendorSales,
};
use crate::models::truck::{SalesPerson, Truck, TruckStatus};

/// Suma de precios de los camiones vendidos
pub fn total_sale_value(trucks: &[Truck]) -> Decimal {
    trucks
        .iter()
        .filter(|t| t.is_sold())
        .filter_map(|t| t.price)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Conteo por estado, todos los estados en orden fijo
pub fn count_by_status(trucks: &[Truck]) -> Vec<StatusCount> {
    TruckStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            label: status.label(),
            count: trucks.iter().filter(|t| t.status == *status).count(),
        })
        .collect()
}

/// Conteo por marca, de mayor a menor
pub fn brand_distribution(trucks: &[Truck]) -> Vec<GroupCount> {
    distribution(trucks.iter().map(|t| t.brand.clone()))
}

/// Conteo por estado (etiqueta), de mayor a menor; solo estados presentes
pub fn status_distribution(trucks: &[Truck]) -> Vec<GroupCount> {
    distribution(trucks.iter().map(|t| t.status.label().to_string()))
}

fn distribution(keys: impl Iterator<Item = String>) -> Vec<GroupCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(name, count)| GroupCount { name, count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    groups
}

/// Ventas agrupadas por mes de `sale_date`
///
/// `None` si ningún camión vendido tiene fecha de venta.
pub fn monthly_sales(trucks: &[Truck]) -> Option<Vec<MonthlySales>> {
    let mut months: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();

    for truck in trucks.iter().filter(|t| t.is_sold()) {
        if let Some(sale_date) = truck.sale_date {
            let entry = months
                .entry(sale_date.format("%Y-%m").to_string())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(truck.price.unwrap_or_default());
        }
    }

    if months.is_empty() {
        return None;
    }

    Some(
        months
            .into_iter()
            .map(|(month, (count, total))| MonthlySales {
                month,
                count,
                total,
            })
            .collect(),
    )
}

/// Ventas por vendedor, en el orden del plantel
pub fn vendor_sales(trucks: &[Truck]) -> Vec<VendorSales> {
    SalesPerson::ALL
        .iter()
        .filter_map(|person| {
            let sold: Vec<&Truck> = trucks
                .iter()
                .filter(|t| t.is_sold() && t.sales_person == *person)
                .collect();
            if sold.is_empty() {
                return None;
            }
            Some(VendorSales {
                sales_person: *person,
                label: person.label(),
                count: sold.len(),
                total: sold
                    .iter()
                    .filter_map(|t| t.price)
                    .fold(Decimal::ZERO, Decimal::saturating_add),
            })
        })
        .collect()
}

/// Resumen completo para el dashboard
pub fn summarize(trucks: &[Truck]) -> InventorySummary {
    InventorySummary {
        total: trucks.len(),
        available: trucks.iter().filter(|t| t.is_available()).count(),
        sold: trucks.iter().filter(|t| t.is_sold()).count(),
        total_sale_value: total_sale_value(trucks),
        count_by_status: count_by_status(trucks),
        brand_distribution: brand_distribution(trucks),
        status_distribution: status_distribution(trucks),
        monthly_sales: monthly_sales(trucks),
        vendor_sales: vendor_sales(trucks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::truck::{Condition, Transmission, TruckType};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn truck(
        brand: &str,
        status: TruckStatus,
        price: &str,
        sale_date: Option<(i32, u32, u32)>,
        sales_person: SalesPerson,
    ) -> Truck {
        Truck {
            id: uuid::Uuid::new_v4().to_string(),
            brand: brand.to_string(),
            model: "M".to_string(),
            year: 2020,
            mileage: 0,
            truck_type: TruckType::Truck,
            transmission: Transmission::Manual,
            engine: String::new(),
            features: String::new(),
            condition: Condition::Used,
            status,
            price: Some(Decimal::from_str(price).unwrap()),
            upload_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            sale_date: sale_date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            sales_person,
            photo_path: None,
        }
    }

    fn sample() -> Vec<Truck> {
        vec![
            truck("Volvo", TruckStatus::Sold, "100.00", Some((2024, 3, 2)), SalesPerson::Seller2),
            truck("Scania", TruckStatus::Sold, "250.50", Some((2024, 1, 20)), SalesPerson::Rapha),
            truck("Volvo", TruckStatus::Available, "500.00", None, SalesPerson::Rapha),
        ]
    }

    #[test]
    fn test_total_sale_value_counts_only_sold() {
        assert_eq!(total_sale_value(&sample()), Decimal::from_str("350.50").unwrap());
    }

    #[test]
    fn test_huge_prices_do_not_overflow() {
        let mut trucks = sample();
        for t in trucks.iter_mut() {
            t.status = TruckStatus::Sold;
            t.sale_date = NaiveDate::from_ymd_opt(2024, 3, 2);
            t.price = Some(Decimal::MAX);
        }

        let summary = summarize(&trucks);
        assert_eq!(summary.total_sale_value, Decimal::MAX);
        assert_eq!(summary.monthly_sales.unwrap()[0].total, Decimal::MAX);
        assert!(summary.vendor_sales.iter().all(|v| v.total == Decimal::MAX));
    }

    #[test]
    fn test_count_by_status_is_zero_filled() {
        let counts = count_by_status(&sample());
        let pairs: Vec<(TruckStatus, usize)> = counts.iter().map(|c| (c.status, c.count)).collect();
        assert_eq!(
            pairs,
            vec![
                (TruckStatus::Available, 1),
                (TruckStatus::Sold, 2),
                (TruckStatus::InMaintenance, 0),
                (TruckStatus::Reserved, 0),
            ]
        );
    }

    #[test]
    fn test_distributions_sorted_by_count_then_name() {
        let brands = brand_distribution(&sample());
        assert_eq!(brands[0], GroupCount { name: "Volvo".to_string(), count: 2 });
        assert_eq!(brands[1], GroupCount { name: "Scania".to_string(), count: 1 });

        let statuses = status_distribution(&sample());
        assert_eq!(statuses[0].name, "Vendido");
        assert_eq!(statuses.len(), 2);
    }

    #[test]
    fn test_monthly_sales_ascending() {
        let months = monthly_sales(&sample()).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-01");
        assert_eq!(months[0].total, Decimal::from_str("250.50").unwrap());
        assert_eq!(months[1].month, "2024-03");
    }

    #[test]
    fn test_monthly_sales_absent_without_sale_dates() {
        let trucks = vec![truck("Volvo", TruckStatus::Sold, "1", None, SalesPerson::Rapha)];
        assert!(monthly_sales(&trucks).is_none());
        assert!(monthly_sales(&[]).is_none());
    }

    #[test]
    fn test_vendor_sales_in_roster_order() {
        let vendors = vendor_sales(&sample());
        assert_eq!(vendors.len(), 2);
        assert_eq!(vendors[0].sales_person, SalesPerson::Rapha);
        assert_eq!(vendors[0].total, Decimal::from_str("250.50").unwrap());
        assert_eq!(vendors[1].label, "Vendedor 2");
        assert_eq!(vendors[1].count, 1);
    }

    #[test]
    fn test_summary_totals() {
        let summary = summarize(&sample());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.sold, 2);
        assert!(summary.monthly_sales.is_some());
    }
}

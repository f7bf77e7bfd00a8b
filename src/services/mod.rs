//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el flujo de
//! inventario, las consultas del catálogo, los agregados del dashboard, la
//! importación/exportación y la autenticación.

pub mod analytics_service;
pub mod auth_service;
pub mod catalog_service;
pub mod inventory_service;
pub mod transfer_service;

pub use auth_service::AuthService;
pub use inventory_service::{DeleteRequest, InventoryService};

//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio del inventario: el registro
//! de camión, los filtros y entradas del catálogo, los agregados del
//! dashboard y la sesión de administración.

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod truck;

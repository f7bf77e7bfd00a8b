//! Inventario y catálogo de una concesionaria de camiones usados
//!
//! El inventario vive en un archivo CSV y las fotos en un directorio; la
//! API HTTP expone el catálogo público y las operaciones de administración.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

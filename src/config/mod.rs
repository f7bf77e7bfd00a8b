//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno del servicio: dirección,
//! rutas del inventario y de las fotos, credencial de administración y JWT.

pub mod environment;

pub use environment::*;

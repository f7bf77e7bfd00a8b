//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{PhotoRepository, TruckRepository};
use crate::services::{AuthService, InventoryService};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub inventory: Arc<InventoryService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Construye los servicios a partir de la configuración
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let inventory = InventoryService::new(
            TruckRepository::new(config.inventory_csv_path.clone()),
            PhotoRepository::new(config.images_dir.clone()),
            config.delete_confirmation_ttl,
            config.whatsapp_number.clone(),
        );
        let auth = AuthService::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            inventory: Arc::new(inventory),
            auth: Arc::new(auth),
        })
    }
}

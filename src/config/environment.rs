//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto; un valor numérico mal
//! formado es un error de configuración.

use std::{env, path::PathBuf, str::FromStr};

use crate::utils::errors::{AppError, AppResult};

/// Número de WhatsApp de la concesionaria
pub const DEFAULT_WHATSAPP_NUMBER: &str = "5541995400112";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub inventory_csv_path: PathBuf,
    pub images_dir: PathBuf,
    pub admin_username: String,
    pub admin_password: String,
    pub bcrypt_cost: u32,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub whatsapp_number: String,
    pub delete_confirmation_ttl: u64,
    pub max_upload_bytes: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            inventory_csv_path: PathBuf::from("data/inventory.csv"),
            images_dir: PathBuf::from("data/images"),
            admin_username: "admin".to_string(),
            admin_password: "password".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            delete_confirmation_ttl: 300,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl EnvironmentConfig {
    /// Lee la configuración desde el entorno (ya cargado con dotenvy)
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: env_or("ENVIRONMENT", defaults.environment),
            port: parse_env("PORT", defaults.port)?,
            host: env_or("HOST", defaults.host),
            inventory_csv_path: env::var("INVENTORY_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.inventory_csv_path),
            images_dir: env::var("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.images_dir),
            admin_username: env_or("ADMIN_USERNAME", defaults.admin_username),
            admin_password: env_or("ADMIN_PASSWORD", defaults.admin_password),
            bcrypt_cost: parse_env("BCRYPT_COST", defaults.bcrypt_cost)?,
            jwt_secret: env_or("JWT_SECRET", defaults.jwt_secret),
            jwt_expiration: parse_env("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            whatsapp_number: env_or("WHATSAPP_NUMBER", defaults.whatsapp_number),
            delete_confirmation_ttl: parse_env(
                "DELETE_CONFIRMATION_TTL",
                defaults.delete_confirmation_ttl,
            )?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
}

fn parse_env<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            AppError::Configuration(format!("{} must be a valid number, got '{}'", key, raw))
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.inventory_csv_path, PathBuf::from("data/inventory.csv"));
        assert_eq!(config.whatsapp_number, DEFAULT_WHATSAPP_NUMBER);
        assert_eq!(config.delete_confirmation_ttl, 300);
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        env::set_var("TRUCK_INVENTORY_TEST_PORT", "not-a-port");
        let parsed: AppResult<u16> = parse_env("TRUCK_INVENTORY_TEST_PORT", 3000);
        assert!(matches!(parsed, Err(AppError::Configuration(_))));
        env::remove_var("TRUCK_INVENTORY_TEST_PORT");
    }

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let parsed: u64 = parse_env("TRUCK_INVENTORY_TEST_UNSET", 42).unwrap();
        assert_eq!(parsed, 42);
    }
}

//! Modelos de autenticación

use serde::{Deserialize, Serialize};

/// Administrador autenticado, insertado en las extensiones del request
/// por el middleware de autenticación
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub username: String,
}

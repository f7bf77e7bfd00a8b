//! Servicio de autenticación
//!
//! Una única credencial de administración definida por configuración. La
//! contraseña solo se guarda en memoria como hash bcrypt.

use bcrypt::{hash, verify};
use tracing::{info, warn};

use crate::config::environment::EnvironmentConfig;
use crate::models::auth::AuthenticatedUser;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, verify_token, JwtConfig};

/// Token emitido tras un login exitoso
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
    pub username: String,
}

pub struct AuthService {
    username: String,
    password_hash: String,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let password_hash = hash(&config.admin_password, config.bcrypt_cost)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        Ok(Self {
            username: config.admin_username.clone(),
            password_hash,
            jwt: JwtConfig::from(config),
        })
    }

    pub fn login(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let password_ok = verify(password, &self.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if username != self.username || !password_ok {
            warn!("⚠️ Intento de login fallido para '{}'", username);
            return Err(AppError::Unauthorized(
                "Usuario o contraseña incorrectos".to_string(),
            ));
        }

        let token = generate_token(&self.username, &self.jwt)?;
        info!("🔐 Login de administración: {}", self.username);

        Ok(IssuedToken {
            token,
            expires_in: self.jwt.expiration,
            username: self.username.clone(),
        })
    }

    /// Valida un token y devuelve el administrador
    pub fn authorize(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let claims = verify_token(token, &self.jwt)?;
        if claims.sub != self.username {
            return Err(AppError::Unauthorized(
                "El token no corresponde al administrador".to_string(),
            ));
        }
        Ok(AuthenticatedUser {
            username: claims.sub,
        })
    }
}

//! Middleware de autenticación JWT
//!
//! Este módulo protege las rutas de administración: extrae el token Bearer,
//! lo verifica e inyecta el administrador autenticado en el request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    state::AppState,
    utils::{errors::AppError, jwt::extract_token_from_header},
};

/// Middleware que exige un token de administración válido
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let user = state.auth.authorize(token)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

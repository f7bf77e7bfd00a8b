use std::sync::Arc;

use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::ApiResponse;
use crate::services::AuthService;
use crate::utils::errors::AppResult;

pub struct AuthController {
    auth: Arc<AuthService>,
}

impl AuthController {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    pub fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
        request.validate()?;
        let issued = self.auth.login(&request.username, &request.password)?;
        Ok(ApiResponse::success_with_message(
            LoginResponse::from(issued),
            "Login exitoso",
        ))
    }
}

//! DTOs de la API HTTP

pub mod api_response;
pub mod auth_dto;
pub mod truck_dto;

pub use api_response::ApiResponse;

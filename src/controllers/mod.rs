pub mod auth_controller;
pub mod truck_controller;

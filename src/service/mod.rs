//! # Car Management Core
//!
//! Orchestrates mapping and storage calls and enforces the VIN uniqueness
//! and existence rules.

mod car_service;
mod errors;

pub use car_service::CarService;
pub use errors::{ServiceError, ServiceResult};

//! # HTTP Server Module
//!
//! The request boundary: translates HTTP verbs, paths and bodies into car
//! service calls and service outcomes into status codes.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/cars/*` - Car CRUD

pub mod car_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;

pub use car_routes::CarState;
pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;

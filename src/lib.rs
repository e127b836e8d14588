//! carms - a small car management service
//!
//! Car records are kept by a storage-assigned id with a unique VIN index
//! and exposed as JSON over `/api/cars`.

pub mod cli;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod service;
pub mod storage;

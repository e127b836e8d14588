//! Car storage subsystem
//!
//! The storage collaborator of the car service: keyed storage of `Car`
//! records with a unique index on VIN.
//!
//! # Invariants Enforced
//!
//! - No two cars with different ids share a VIN. `save` rejects a
//!   violating write even when callers skipped their own check.
//! - Ids are assigned on first save, ascending, and never reused.
//! - Each repository call is atomic.
//! - File snapshots are checksum-verified on open.

mod config;
mod errors;
mod file;
mod memory;
mod repository;
mod table;

pub use config::StorageConfig;
pub use errors::{StorageError, StorageResult};
pub use file::{FileCarRepository, SNAPSHOT_FILE};
pub use memory::MemoryCarRepository;
pub use repository::{CarRepository, SharedRepository};
pub use table::{CarTable, TableImage, FIRST_ID};

//! Storage backend selection

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::StorageResult;
use super::file::FileCarRepository;
use super::memory::MemoryCarRepository;
use super::repository::SharedRepository;

/// Which repository backs the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Volatile, lost on exit
    #[default]
    Memory,
    /// JSON snapshot under `data_dir`
    File { data_dir: PathBuf },
}

impl StorageConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageConfig::Memory => "memory",
            StorageConfig::File { .. } => "file",
        }
    }

    /// Open the configured repository
    pub fn open(&self) -> StorageResult<SharedRepository> {
        let repository: SharedRepository = match self {
            StorageConfig::Memory => Arc::new(MemoryCarRepository::new()),
            StorageConfig::File { data_dir } => Arc::new(FileCarRepository::open(data_dir)?),
        };
        Ok(repository)
    }
}

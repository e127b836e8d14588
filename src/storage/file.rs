//! Durable car repository backed by a JSON snapshot file.
//!
//! The whole table is rewritten to `<data_dir>/cars.json` after every
//! mutation: written to a temp file, fsynced, renamed over the previous
//! snapshot, and the directory fsynced so the rename itself is durable. A mutation is applied in memory only after its
//! snapshot is on disk, so a failed write leaves both unchanged.
//!
//! The snapshot carries a CRC32 of its table payload. A mismatch on open
//! is reported as corruption and never ignored.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::errors::{StorageError, StorageResult};
use super::repository::CarRepository;
use super::table::{CarTable, TableImage};
use crate::model::{Car, CarId};

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE: &str = "cars.json";

const SNAPSHOT_TMP_FILE: &str = "cars.json.tmp";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    format_version: u32,
    checksum: u32,
    table: TableImage,
}

pub struct FileCarRepository {
    data_dir: PathBuf,
    table: RwLock<CarTable>,
}

impl FileCarRepository {
    /// Open the repository in `data_dir`, creating the directory if needed.
    ///
    /// An existing snapshot is loaded and verified; a missing one means an
    /// empty table.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|e| {
                StorageError::io(
                    format!("Failed to create data directory: {}", data_dir.display()),
                    e,
                )
            })?;
        }

        let snapshot_path = data_dir.join(SNAPSHOT_FILE);
        let table = if snapshot_path.exists() {
            read_snapshot(&snapshot_path)?
        } else {
            CarTable::new()
        };

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            table: RwLock::new(table),
        })
    }

    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    /// Persist `staged` and make it the live table.
    fn commit(&self, live: &mut CarTable, staged: CarTable) -> StorageResult<()> {
        write_snapshot(&self.data_dir, &staged)?;
        *live = staged;
        Ok(())
    }
}

impl CarRepository for FileCarRepository {
    fn find_by_id(&self, id: CarId) -> StorageResult<Option<Car>> {
        Ok(self.table.read()?.get(id).cloned())
    }

    fn find_by_vin(&self, vin: &str) -> StorageResult<Option<Car>> {
        Ok(self.table.read()?.get_by_vin(vin).cloned())
    }

    fn exists_by_vin(&self, vin: &str) -> StorageResult<bool> {
        Ok(self.table.read()?.contains_vin(vin))
    }

    fn exists_by_id(&self, id: CarId) -> StorageResult<bool> {
        Ok(self.table.read()?.contains_id(id))
    }

    fn save(&self, car: Car) -> StorageResult<Car> {
        let mut live = self.table.write()?;
        let mut staged = live.clone();
        let saved = staged.upsert(car)?;
        self.commit(&mut live, staged)?;
        Ok(saved)
    }

    fn delete_by_id(&self, id: CarId) -> StorageResult<bool> {
        let mut live = self.table.write()?;
        if !live.contains_id(id) {
            return Ok(false);
        }
        let mut staged = live.clone();
        staged.remove(id);
        self.commit(&mut live, staged)?;
        Ok(true)
    }

    fn find_all(&self) -> StorageResult<Vec<Car>> {
        Ok(self.table.read()?.all())
    }
}

fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn encode_table(image: &TableImage) -> StorageResult<Vec<u8>> {
    serde_json::to_vec(image).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn read_snapshot(path: &Path) -> StorageResult<CarTable> {
    let bytes = fs::read(path).map_err(|e| {
        StorageError::io(format!("Failed to read snapshot: {}", path.display()), e)
    })?;

    let snapshot: SnapshotFile = serde_json::from_slice(&bytes)
        .map_err(|e| StorageError::Corrupted(format!("{}: {}", path.display(), e)))?;

    if snapshot.format_version != FORMAT_VERSION {
        return Err(StorageError::Corrupted(format!(
            "unsupported snapshot format version {}",
            snapshot.format_version
        )));
    }

    let payload = encode_table(&snapshot.table)?;
    if compute_checksum(&payload) != snapshot.checksum {
        return Err(StorageError::Corrupted(format!(
            "checksum mismatch in {}",
            path.display()
        )));
    }

    CarTable::from_image(snapshot.table)
}

fn write_snapshot(data_dir: &Path, table: &CarTable) -> StorageResult<()> {
    let image = table.to_image();
    let checksum = compute_checksum(&encode_table(&image)?);
    let snapshot = SnapshotFile {
        format_version: FORMAT_VERSION,
        checksum,
        table: image,
    };
    let bytes = serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    let tmp_path = data_dir.join(SNAPSHOT_TMP_FILE);
    let final_path = data_dir.join(SNAPSHOT_FILE);

    let mut file = File::create(&tmp_path).map_err(|e| {
        StorageError::io(format!("Failed to create {}", tmp_path.display()), e)
    })?;
    file.write_all(&bytes)
        .map_err(|e| StorageError::io("Failed to write snapshot", e))?;
    file.sync_all()
        .map_err(|e| StorageError::io("Failed to fsync snapshot", e))?;
    drop(file);

    fs::rename(&tmp_path, &final_path).map_err(|e| {
        StorageError::io(format!("Failed to replace {}", final_path.display()), e)
    })?;

    fsync_dir(data_dir)
}

/// fsync a directory so entries renamed into it survive a crash.
fn fsync_dir(path: &Path) -> StorageResult<()> {
    let dir = OpenOptions::new().read(true).open(path).map_err(|e| {
        StorageError::io(format!("Failed to open directory {}", path.display()), e)
    })?;

    dir.sync_all().map_err(|e| {
        StorageError::io(format!("fsync directory failed: {}", path.display()), e)
    })
}

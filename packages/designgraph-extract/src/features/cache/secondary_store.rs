//! Secondary tier storage
//!
//! Stores opaque bytes (JSON envelopes produced by `TieredCache`) keyed by
//! the cache key. Expiry is the tiered cache's job, not the store's.

use crate::features::cache::{types::StoredEntryHeader, CacheError, CacheResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub trait SecondaryStore: Send + Sync {
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    fn write(&self, key: &str, bytes: &[u8]) -> CacheResult<()>;

    fn remove(&self, key: &str) -> CacheResult<bool>;

    fn clear(&self) -> CacheResult<()>;

    fn keys(&self) -> CacheResult<Vec<String>>;
}

/// In-process secondary tier (hybrid strategy)
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecondaryStore for MemoryStore {
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> CacheResult<()> {
        self.entries.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn clear(&self) -> CacheResult<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

/// One JSON file per key under a directory
///
/// File names are the blake3 hex digest of the key; writes go through a
/// uniquely named temp file and an atomic rename. The directory may hold
/// other files: listing and clearing only touch envelopes whose file name
/// matches the digest of the key they carry.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    const EXTENSION: &'static str = "json";
    const TMP_EXTENSION: &'static str = "dgcache-tmp";

    pub fn new(dir: impl Into<PathBuf>) -> CacheResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        let digest = blake3::hash(key.as_bytes()).to_hex();
        self.dir.join(format!("{}.{}", digest, Self::EXTENSION))
    }

    fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension().and_then(|s| s.to_str()) == Some(extension)
    }

    fn read_header(path: &Path) -> CacheResult<StoredEntryHeader> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupted(e.to_string()))
    }

    /// Files this store wrote, with the key each one holds
    fn owned_entries(&self) -> CacheResult<Vec<(PathBuf, String)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !Self::has_extension(&path, Self::EXTENSION) {
                continue;
            }
            match Self::read_header(&path) {
                Ok(header) if self.key_to_path(&header.key) == path => {
                    entries.push((path, header.key));
                }
                Ok(header) => tracing::debug!(
                    "Skipping {:?}: file name does not match key {}",
                    path,
                    header.key
                ),
                Err(e) => tracing::debug!("Skipping unreadable cache file {:?}: {}", path, e),
            }
        }
        Ok(entries)
    }

    fn remove_path(path: &Path) -> CacheResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SecondaryStore for DiskStore {
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        match fs::read(self.key_to_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> CacheResult<()> {
        let file_path = self.key_to_path(key);

        // Atomic write: tmp file + rename
        let tmp_path = self
            .dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), Self::TMP_EXTENSION));
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&tmp_path, &file_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CacheError::Io(e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<bool> {
        match fs::remove_file(self.key_to_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> CacheResult<()> {
        for (path, _) in self.owned_entries()? {
            Self::remove_path(&path)?;
        }

        // Leftovers from interrupted writes
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if Self::has_extension(&path, Self::TMP_EXTENSION) {
                Self::remove_path(&path)?;
            }
        }
        Ok(())
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .owned_entries()?
            .into_iter()
            .map(|(_, key)| key)
            .collect();
        keys.sort();
        Ok(keys)
    }
}

//! JSON file storage implementation
//!
//! All slots live in one `storage.json` object (`{"key": "value", ...}`) in
//! the data directory. Writes go through a temp file and a rename while an
//! exclusive lock is held on a sidecar `.lock` file, so concurrent `cart`
//! processes never see a half-written file.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStorage;

/// Storage file name inside the data directory
pub const STORAGE_FILENAME: &str = "storage.json";

/// Maximum number of attempts to take the lock
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Held lock on the sidecar file, released on drop
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// File-backed key-value storage
pub struct JsonFileStorage {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStorage {
    /// Open (or lazily create) `storage.json` in `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORAGE_FILENAME);
        let lock_path = data_dir.join(format!("{}.lock", STORAGE_FILENAME));
        Ok(Self { path, lock_path })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, exclusive: bool) -> Result<LockGuard> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;

        let mut delay = INITIAL_RETRY_DELAY_MS;
        for attempt in 0..MAX_RETRIES {
            let locked = if exclusive {
                FileExt::try_lock_exclusive(&file)
            } else {
                FileExt::try_lock_shared(&file)
            };
            match locked {
                Ok(()) => return Ok(LockGuard { file }),
                Err(_) if attempt + 1 < MAX_RETRIES => {
                    thread::sleep(Duration::from_millis(delay));
                    delay *= 2;
                }
                Err(e) => {
                    return Err(Error::storage(format!(
                        "could not lock {}: {}",
                        self.lock_path.display(),
                        e
                    )))
                }
            }
        }
        Err(Error::storage(format!(
            "could not lock {}",
            self.lock_path.display()
        )))
    }

    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn parse_slots(&self, content: Option<&str>) -> Result<BTreeMap<String, String>> {
        match content {
            Some(content) if !content.trim().is_empty() => serde_json::from_str(content)
                .map_err(|e| {
                    Error::storage(format!("{} is not a storage file: {}", self.path.display(), e))
                }),
            _ => Ok(BTreeMap::new()),
        }
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>> {
        let raw = self.read_raw()?;
        self.parse_slots(raw.as_deref())
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::storage("storage file has no parent directory"))?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        let content = serde_json::to_string_pretty(slots)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Read-modify-write under the exclusive lock
    ///
    /// A file that doesn't parse is replaced rather than blocking every future
    /// write. A file that can't be read fails the write and is left alone.
    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.lock(true)?;
        let raw = self.read_raw()?;
        let mut slots = self.parse_slots(raw.as_deref()).unwrap_or_default();
        f(&mut slots);
        self.write_slots(&slots)
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock(false)?;
        let slots = self.read_slots()?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|slots| {
            slots.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|slots| {
            slots.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_missing_key() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.get("cart").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_set_and_get() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        storage.set("cart", "[]").unwrap();
        storage.set("theme", "dark").unwrap();
        storage.set("cart", "[1]").unwrap();

        assert_eq!(storage.get("cart").unwrap(), Some("[1]".to_string()));
        assert_eq!(storage.get("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        JsonFileStorage::new(dir.path())
            .unwrap()
            .set("cart", "saved")
            .unwrap();

        let reopened = JsonFileStorage::new(dir.path()).unwrap();
        assert_eq!(reopened.get("cart").unwrap(), Some("saved".to_string()));
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        storage.set("cart", "x").unwrap();
        storage.remove("cart").unwrap();
        storage.remove("never-set").unwrap();

        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();
        fs::write(storage.path(), "not json at all").unwrap();

        assert!(matches!(storage.get("cart"), Err(Error::Storage(_))));

        // Writing replaces the corrupt file
        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_unreadable_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();
        fs::create_dir(storage.path()).unwrap();
        fs::write(storage.path().join("keep.txt"), "still here").unwrap();

        assert!(matches!(storage.set("cart", "[]"), Err(Error::Io(_))));
        assert!(matches!(storage.remove("cart"), Err(Error::Io(_))));
        assert!(storage.path().is_dir());
        assert_eq!(
            fs::read_to_string(storage.path().join("keep.txt")).unwrap(),
            "still here"
        );
    }

    #[test]
    fn test_creates_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = JsonFileStorage::new(&nested).unwrap();

        storage.set("cart", "[]").unwrap();
        assert!(nested.join(STORAGE_FILENAME).exists());
    }
}

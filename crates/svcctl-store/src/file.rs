//! Single-file session storage.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument};
use uuid::Uuid;

use svcctl_core::error::{Error, StorageError};
use svcctl_core::{Result, SessionStorage, StoredSession};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

fn map_io(path: &Path, err: io::Error) -> Error {
    Error::Storage(StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Stores the session record as one JSON file.
///
/// Writes go to a temporary sibling file which is synced and renamed over
/// the record, all under an exclusive lock on `<file>.lock`. On Unix the
/// record is created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Store the record at `path`. Parent directories are created on first
    /// write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }

    /// Take the exclusive lock. Released when the returned file is dropped.
    fn lock(&self) -> Result<File> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io(parent, e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| map_io(&lock_path, e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| map_io(&lock_path, e))?;
        Ok(lock_file)
    }

    fn write_temp(&self, temp: &Path, contents: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create_new(true).write(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(temp)?;
        file.write_all(contents)?;
        file.sync_all()
    }
}

impl SessionStorage for FileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<StoredSession> {
        let _lock = self.lock()?;

        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored session");
                return Ok(StoredSession::default());
            }
            Err(e) => return Err(map_io(&self.path, e)),
        };

        serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: e.to_string(),
            })
        })
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn save(&self, record: &StoredSession) -> Result<()> {
        let json = serde_json::to_vec_pretty(record).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: e.to_string(),
            })
        })?;

        let _lock = self.lock()?;
        let temp = self.temp_path();

        if let Err(e) = self.write_temp(&temp, &json) {
            let _ = fs::remove_file(&temp);
            return Err(map_io(&temp, e));
        }
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(map_io(&self.path, e));
        }

        debug!("Stored session written");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        let _lock = self.lock()?;

        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Stored session removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> StoredSession {
        StoredSession {
            token: Some("tok".into()),
            refresh_token: Some("rtok".into()),
            user: Some(r#"{"id":"u-1"}"#.into()),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("a/b/session.json"));

        storage.save(&record()).unwrap();

        assert_eq!(storage.load().unwrap(), record());
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.save(&record()).unwrap();
        storage.save(&StoredSession::default()).unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["session.json", "session.json.lock"]);
    }

    #[test]
    fn clear_removes_record_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.save(&record()).unwrap();

        storage.clear().unwrap();
        assert!(!storage.path().exists());
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Corrupt { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn record_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.save(&record()).unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

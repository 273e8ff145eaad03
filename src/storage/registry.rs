//! In-memory small file registry.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use serde::Deserialize;

use crate::domain::{content_checksum, FileKey, NewSmallFile, SmallFileRecord};
use crate::error::{SmallFileError, SmallFileResult};

/// Point lookup of small files by id.
///
/// Must be safe to call from many requests at once while registrations run.
/// A lookup sees a record completely or not at all.
pub trait SmallFileLookup: Send + Sync {
    fn get_small_file(&self, id: i64) -> Option<Arc<SmallFileRecord>>;
}

/// Registry size limits.
#[derive(Debug, Clone, Copy)]
pub struct RegistryLimits {
    pub max_file_size_bytes: u64,
    pub max_file_count: usize,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 1024 * 1024,
            max_file_count: 100,
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    by_id: HashMap<i64, Arc<SmallFileRecord>>,
    by_key: HashMap<FileKey, i64>,
}

/// Small file registry shared across handlers.
#[derive(Clone)]
pub struct SmallFileRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: RegistryLimits,
}

impl SmallFileRegistry {
    /// Create an empty registry with the given limits.
    pub fn new(limits: RegistryLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
            limits,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryInner> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryInner> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new small file.
    pub fn register(&self, file: NewSmallFile) -> SmallFileResult<Arc<SmallFileRecord>> {
        let size = file.content.len() as u64;
        if size > self.limits.max_file_size_bytes {
            return Err(SmallFileError::FileTooLarge {
                name: file.name,
                size,
                limit: self.limits.max_file_size_bytes,
            });
        }

        let key = file.key();
        let mut inner = self.write();

        if inner.by_id.len() >= self.limits.max_file_count {
            return Err(SmallFileError::TooManyFiles(self.limits.max_file_count));
        }
        if inner.by_id.contains_key(&file.id) {
            return Err(SmallFileError::DuplicateFile(format!("id {}", file.id)));
        }
        if inner.by_key.contains_key(&key) {
            return Err(SmallFileError::DuplicateFile(key.to_string()));
        }

        let record = Arc::new(SmallFileRecord::from_new(file));
        inner.by_key.insert(key, record.id);
        inner.by_id.insert(record.id, Arc::clone(&record));

        tracing::info!(
            file_id = record.id,
            file = %record.key(),
            size = record.size,
            checksum = %record.checksum,
            is_content = record.is_content,
            "Small file registered"
        );

        Ok(record)
    }

    /// Remove a small file by id, returning it if it was registered.
    ///
    /// The server only registers files at startup and never removes them.
    #[allow(dead_code)]
    pub fn remove(&self, id: i64) -> Option<Arc<SmallFileRecord>> {
        let mut inner = self.write();
        let record = inner.by_id.remove(&id)?;
        inner.by_key.remove(&record.key());

        tracing::info!(file_id = id, file = %record.key(), "Small file removed");
        Some(record)
    }

    /// Check whether a name is taken within a database and catalog.
    #[allow(dead_code)]
    pub fn contains_name(&self, db_name: &str, catalog: &str, name: &str) -> bool {
        self.read()
            .by_key
            .contains_key(&FileKey::new(db_name, catalog, name))
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register every configured file, reading bodies from disk.
    ///
    /// Metadata-only entries are read too: their size and checksum come from
    /// the body, which is then dropped. Stops at the first failure.
    pub async fn load_configured(&self, files: &[ConfiguredSmallFile]) -> SmallFileResult<usize> {
        for file in files {
            if file.name.is_empty() {
                return Err(SmallFileError::Config(format!(
                    "small file {} has an empty name",
                    file.id
                )));
            }

            let content = tokio::fs::read(&file.path).await.map_err(|e| {
                tracing::error!(path = %file.path.display(), error = %e, "Failed to read small file");
                SmallFileError::Io(e)
            })?;

            if let Some(expected) = &file.checksum {
                let actual = content_checksum(&content);
                if !expected.eq_ignore_ascii_case(&actual) {
                    return Err(SmallFileError::ChecksumMismatch {
                        name: file.name.clone(),
                        expected: expected.clone(),
                        actual,
                    });
                }
            }

            let mut new_file = NewSmallFile::content(
                file.id,
                &file.db_name,
                &file.catalog,
                &file.name,
                Bytes::from(content),
            );
            if !file.is_content {
                new_file = new_file.metadata_only();
            }
            self.register(new_file)?;
        }

        Ok(files.len())
    }
}

impl SmallFileLookup for SmallFileRegistry {
    fn get_small_file(&self, id: i64) -> Option<Arc<SmallFileRecord>> {
        self.read().by_id.get(&id).cloned()
    }
}

/// Small file entry from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredSmallFile {
    pub id: i64,
    pub db_name: String,
    pub catalog: String,
    pub name: String,
    /// Location of the file body on disk. Must be readable for
    /// metadata-only entries as well.
    pub path: PathBuf,
    /// Expected hex SHA-256 of the body.
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default = "default_is_content")]
    pub is_content: bool,
}

fn default_is_content() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn ca_pem(id: i64) -> NewSmallFile {
        NewSmallFile::content(id, "db1", "kafka", format!("ca-{id}.pem"), "-----BEGIN CERT-----")
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = SmallFileRegistry::new(RegistryLimits::default());
        assert!(registry.is_empty());

        let record = assert_ok!(registry.register(ca_pem(42)));
        assert_eq!(record.id, 42);

        let found = registry.get_small_file(42).unwrap();
        assert_eq!(found.name, "ca-42.pem");
        assert_eq!(found.content, Bytes::from_static(b"-----BEGIN CERT-----"));
        assert!(registry.contains_name("db1", "kafka", "ca-42.pem"));
        assert!(registry.get_small_file(43).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = SmallFileRegistry::new(RegistryLimits::default());
        assert_ok!(registry.register(ca_pem(1)));

        // Same id, different name
        let same_id = NewSmallFile::content(1, "db1", "kafka", "other.pem", "x");
        assert!(matches!(
            registry.register(same_id),
            Err(SmallFileError::DuplicateFile(_))
        ));

        // Same name, different id
        let same_name = NewSmallFile::content(2, "db1", "kafka", "ca-1.pem", "x");
        assert!(matches!(
            registry.register(same_name),
            Err(SmallFileError::DuplicateFile(_))
        ));

        // Same name in another catalog is fine
        assert_ok!(registry.register(NewSmallFile::content(3, "db1", "s3", "ca-1.pem", "x")));
    }

    #[test]
    fn test_limits_enforced() {
        let registry = SmallFileRegistry::new(RegistryLimits {
            max_file_size_bytes: 4,
            max_file_count: 1,
        });

        let too_large = NewSmallFile::content(1, "db", "c", "big", "12345");
        assert!(matches!(
            registry.register(too_large),
            Err(SmallFileError::FileTooLarge { size: 5, limit: 4, .. })
        ));

        assert_ok!(registry.register(NewSmallFile::content(1, "db", "c", "a", "1234")));
        let overflow = registry.register(NewSmallFile::content(2, "db", "c", "b", "1"));
        assert!(matches!(overflow, Err(SmallFileError::TooManyFiles(1))));
    }

    #[test]
    fn test_remove_frees_id_and_name() {
        let registry = SmallFileRegistry::new(RegistryLimits::default());
        assert_ok!(registry.register(ca_pem(5)));

        let removed = registry.remove(5).unwrap();
        assert_eq!(removed.id, 5);
        assert!(registry.get_small_file(5).is_none());
        assert!(!registry.contains_name("db1", "kafka", "ca-5.pem"));
        assert!(registry.remove(5).is_none());

        assert_ok!(registry.register(ca_pem(5)));
    }

    #[test]
    fn test_lookup_holds_record_across_removal() {
        let registry = SmallFileRegistry::new(RegistryLimits::default());
        assert_ok!(registry.register(ca_pem(9)));

        let snapshot = registry.get_small_file(9).unwrap();
        registry.remove(9);

        assert_eq!(snapshot.content, Bytes::from_static(b"-----BEGIN CERT-----"));
    }

    #[tokio::test]
    async fn test_concurrent_lookups_during_registration() {
        let registry = SmallFileRegistry::new(RegistryLimits::default());
        assert_ok!(registry.register(ca_pem(0)));

        let writer = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for id in 1..50 {
                    registry.register(ca_pem(id)).unwrap();
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            readers.push(tokio::spawn(async move {
                for id in 0..50 {
                    if let Some(record) = registry.get_small_file(id) {
                        assert_eq!(record.id, id);
                        assert_eq!(record.size, record.content.len() as u64);
                    }
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(registry.len(), 50);
    }

    fn temp_file(contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("smallfile-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_configured_files() {
        let ca = temp_file(b"ca-body");
        let key = temp_file(b"key-body");
        let registry = SmallFileRegistry::new(RegistryLimits::default());

        let files = vec![
            ConfiguredSmallFile {
                id: 1,
                db_name: "db1".to_string(),
                catalog: "kafka".to_string(),
                name: "ca.pem".to_string(),
                path: ca.clone(),
                checksum: Some(content_checksum(b"ca-body").to_uppercase()),
                is_content: true,
            },
            ConfiguredSmallFile {
                id: 2,
                db_name: "db1".to_string(),
                catalog: "kafka".to_string(),
                name: "client.key".to_string(),
                path: key.clone(),
                checksum: None,
                is_content: false,
            },
        ];

        let loaded = assert_ok!(registry.load_configured(&files).await);
        assert_eq!(loaded, 2);
        assert_eq!(
            registry.get_small_file(1).unwrap().content,
            Bytes::from_static(b"ca-body")
        );
        let metadata_only = registry.get_small_file(2).unwrap();
        assert!(!metadata_only.is_content);
        assert!(metadata_only.content.is_empty());
        assert_eq!(metadata_only.size, 8);
        assert_eq!(metadata_only.checksum, content_checksum(b"key-body"));

        std::fs::remove_file(ca).unwrap();
        std::fs::remove_file(key).unwrap();
    }

    #[tokio::test]
    async fn test_load_configured_rejects_bad_checksum_and_missing_file() {
        let ca = temp_file(b"ca-body");
        let registry = SmallFileRegistry::new(RegistryLimits::default());

        let mut file = ConfiguredSmallFile {
            id: 1,
            db_name: "db1".to_string(),
            catalog: "kafka".to_string(),
            name: "ca.pem".to_string(),
            path: ca.clone(),
            checksum: Some("deadbeef".to_string()),
            is_content: true,
        };

        let err = assert_err!(registry.load_configured(&[file.clone()]).await);
        assert!(matches!(err, SmallFileError::ChecksumMismatch { .. }));
        assert!(registry.is_empty());

        file.checksum = None;
        file.path = std::env::temp_dir().join("smallfile-does-not-exist");
        let err = assert_err!(registry.load_configured(&[file.clone()]).await);
        assert!(matches!(err, SmallFileError::Io(_)));

        file.name = String::new();
        let err = assert_err!(registry.load_configured(&[file]).await);
        assert!(matches!(err, SmallFileError::Config(_)));

        std::fs::remove_file(ca).unwrap();
    }
}

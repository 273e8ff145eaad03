//! Small file records held by the registry.

use bytes::Bytes;
use sha2::{Digest, Sha256};

/// A registered small file.
///
/// Records are immutable once registered. A metadata-only record
/// (`is_content == false`) keeps its size and checksum but carries no bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallFileRecord {
    pub id: i64,
    pub db_name: String,
    pub catalog: String,
    /// Served as the attachment filename.
    pub name: String,
    pub is_content: bool,
    pub content: Bytes,
    pub size: u64,
    /// Hex-encoded SHA-256 of the original content.
    pub checksum: String,
}

impl SmallFileRecord {
    /// Build a record from a registration request.
    pub fn from_new(file: NewSmallFile) -> Self {
        let size = file.content.len() as u64;
        let checksum = content_checksum(&file.content);
        let content = if file.is_content {
            file.content
        } else {
            Bytes::new()
        };

        Self {
            id: file.id,
            db_name: file.db_name,
            catalog: file.catalog,
            name: file.name,
            is_content: file.is_content,
            content,
            size,
            checksum,
        }
    }

    pub fn key(&self) -> FileKey {
        FileKey::new(&self.db_name, &self.catalog, &self.name)
    }
}

/// A small file about to be registered.
#[derive(Debug, Clone)]
pub struct NewSmallFile {
    pub id: i64,
    pub db_name: String,
    pub catalog: String,
    pub name: String,
    pub is_content: bool,
    pub content: Bytes,
}

impl NewSmallFile {
    /// A content-bearing file.
    pub fn content(
        id: i64,
        db_name: impl Into<String>,
        catalog: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            id,
            db_name: db_name.into(),
            catalog: catalog.into(),
            name: name.into(),
            is_content: true,
            content: content.into(),
        }
    }

    /// Mark the file as metadata-only.
    pub fn metadata_only(mut self) -> Self {
        self.is_content = false;
        self
    }

    pub fn key(&self) -> FileKey {
        FileKey::new(&self.db_name, &self.catalog, &self.name)
    }
}

/// Names are unique within a (database, catalog) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub db_name: String,
    pub catalog: String,
    pub name: String,
}

impl FileKey {
    pub fn new(db_name: &str, catalog: &str, name: &str) -> Self {
        Self {
            db_name: db_name.to_string(),
            catalog: catalog.to_string(),
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.db_name, self.catalog, self.name)
    }
}

/// Hex-encoded SHA-256 of a file body.
pub fn content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

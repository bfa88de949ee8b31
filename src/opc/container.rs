//! Provides access to the parts of a physical `.docx` package (ZIP file).
//!
//! The whole archive is read into memory once and parts are decompressed on
//! demand. Nothing is written to disk, so dropping the [`Container`] releases
//! everything the extraction touched, whether it finished or failed.

use crate::error::{CommentsError, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// A source of named parts.
///
/// This is the seam between the extraction pipeline and whatever actually
/// holds the package bytes. Absence of a part is reported as `Ok(None)`;
/// errors are reserved for containers that cannot be read.
pub trait PartSource {
    /// Read the decompressed bytes of the part with the given member name.
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Check whether a part exists without decompressing it.
    fn has_part(&mut self, name: &str) -> Result<bool> {
        Ok(self.read_part(name)?.is_some())
    }
}

/// A ZIP-backed `.docx` container that owns its data buffer.
pub struct Container {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Container {
    /// Open a container from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`CommentsError::PackageNotFound`] if the path does not exist and
    /// [`CommentsError::Container`] if the file is not a readable ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CommentsError::PackageNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Create a container from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Create a container from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Number of members in the archive.
    #[inline]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// List all member names in the archive.
    pub fn member_names(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }
}

impl PartSource for Container {
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(index) = self.archive.index_for_name(name) else {
            return Ok(None);
        };

        let mut file = self.archive.by_index(index)?;
        let mut blob = Vec::new();
        file.read_to_end(&mut blob)
            .map_err(|e| CommentsError::Container(format!("{name}: {e}")))?;
        Ok(Some(blob))
    }

    fn has_part(&mut self, name: &str) -> Result<bool> {
        Ok(self.archive.index_for_name(name).is_some())
    }
}

/// An in-memory container holding already decompressed parts.
///
/// Useful when parts come from somewhere other than a ZIP file, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    parts: HashMap<String, Vec<u8>>,
}

impl MemoryContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a part.
    pub fn with_part(mut self, name: impl Into<String>, blob: impl Into<Vec<u8>>) -> Self {
        self.insert(name, blob);
        self
    }

    /// Add or replace a part in place.
    pub fn insert(&mut self, name: impl Into<String>, blob: impl Into<Vec<u8>>) {
        self.parts.insert(name.into(), blob.into());
    }
}

impl PartSource for MemoryContainer {
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.parts.get(name).cloned())
    }

    fn has_part(&mut self, name: &str) -> Result<bool> {
        Ok(self.parts.contains_key(name))
    }
}

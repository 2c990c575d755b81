//! Audio resource access
//!
//! The scoring engine never touches the filesystem directly; it reads raw
//! bytes through an [`AudioStore`]. Stores are read-only from the engine's
//! perspective and may be shared across threads.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Raw bytes of one audio resource
#[derive(Debug, Clone)]
pub struct AudioResource {
    /// Encoded audio (any container symphonia can probe)
    pub bytes: Vec<u8>,
    /// Lowercase file extension used as a format hint
    pub extension: Option<String>,
}

impl AudioResource {
    pub fn new(bytes: Vec<u8>, extension: Option<String>) -> Self {
        Self { bytes, extension }
    }
}

/// Read access to stored audio
pub trait AudioStore: Send + Sync {
    /// Fetch the encoded bytes stored under `identifier`
    fn read_audio(&self, identifier: &str) -> Result<AudioResource, StorageError>;
}

/// Extension of an identifier, lowercased
fn extension_hint(identifier: &str) -> Option<String> {
    Path::new(identifier)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Store backed by a folder on disk
///
/// Identifiers are relative paths below `root`. Absolute paths and `..`
/// components are rejected so an identifier can never escape the root.
#[derive(Debug, Clone)]
pub struct FsAudioStore {
    root: PathBuf,
}

impl FsAudioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an identifier to a path inside the root folder
    pub fn resolve(&self, identifier: &str) -> Result<PathBuf, StorageError> {
        let invalid = |reason: &str| StorageError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        if identifier.trim().is_empty() {
            return Err(invalid("identifier is empty"));
        }

        let relative = Path::new(identifier);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => return Err(invalid("parent directory references are not allowed")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("absolute paths are not allowed"))
                }
            }
        }

        Ok(self.root.join(relative))
    }
}

impl AudioStore for FsAudioStore {
    fn read_audio(&self, identifier: &str) -> Result<AudioResource, StorageError> {
        let path = self.resolve(identifier)?;
        tracing::debug!(identifier, path = %path.display(), "Reading audio resource");

        if path.is_dir() {
            return Err(StorageError::NotFound(identifier.to_string()));
        }

        let bytes = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(identifier.to_string())
            } else {
                StorageError::Io {
                    identifier: identifier.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(AudioResource::new(bytes, extension_hint(identifier)))
    }
}

/// Store holding resources in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAudioStore {
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryAudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn insert(&mut self, identifier: impl Into<String>, bytes: Vec<u8>) {
        self.resources.insert(identifier.into(), bytes);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_resource(mut self, identifier: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(identifier, bytes);
        self
    }
}

impl AudioStore for MemoryAudioStore {
    fn read_audio(&self, identifier: &str) -> Result<AudioResource, StorageError> {
        self.resources
            .get(identifier)
            .map(|bytes| AudioResource::new(bytes.clone(), extension_hint(identifier)))
            .ok_or_else(|| StorageError::NotFound(identifier.to_string()))
    }
}

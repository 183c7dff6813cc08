use crate::error::{Error, Result};
use dashmap::DashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identifies one member's byte range inside one file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CacheKey {
    pub path: PathBuf,
    pub name: String,
    pub type_name: String,
    pub offset: usize,
    pub length: usize,
}

impl CacheKey {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Shared, concurrently populated cache of file contents.
///
/// A file's bytes are read once per distinct path and then registered under
/// every member key that asks for them. Concurrent misses for the same path
/// may both read the file; the last insert wins and both buffers are equal.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: DashMap<PathBuf, Arc<[u8]>>,
    members: DashMap<CacheKey, Arc<[u8]>>,
    decodes: AtomicUsize,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full byte buffer of the file owning `key`
    pub fn buffer(&self, key: &CacheKey) -> Result<Arc<[u8]>> {
        if let Some(buffer) = self.members.get(key).map(|entry| Arc::clone(entry.value())) {
            return Ok(buffer);
        }

        let buffer = self.file_buffer(&key.path)?;
        self.members.insert(key.clone(), Arc::clone(&buffer));
        Ok(buffer)
    }

    fn file_buffer(&self, path: &Path) -> Result<Arc<[u8]>> {
        if let Some(buffer) = self.files.get(path).map(|entry| Arc::clone(entry.value())) {
            return Ok(buffer);
        }

        tracing::debug!("Decoding {} for passthrough extraction", path.display());
        let buffer: Arc<[u8]> = std::fs::read(path)?.into();
        self.decodes.fetch_add(1, Ordering::Relaxed);
        self.files.insert(path.to_path_buf(), Arc::clone(&buffer));
        Ok(buffer)
    }

    /// Text at `[offset, offset + length)` of the owning file, byte-exact
    pub fn extract(&self, key: &CacheKey) -> Result<String> {
        let buffer = self.buffer(key)?;
        let bytes = buffer.get(key.range()).ok_or_else(|| {
            Error::ExtractionError(format!(
                "range {}..{} of '{}' is outside {} ({} bytes)",
                key.offset,
                key.offset + key.length,
                key.name,
                key.path.display(),
                buffer.len()
            ))
        })?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            Error::ExtractionError(format!(
                "range of '{}' in {} is not valid UTF-8: {e}",
                key.name,
                key.path.display()
            ))
        })
    }

    /// Number of file reads performed so far
    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&self) {
        self.members.clear();
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(path: &Path, name: &str, offset: usize, length: usize) -> CacheKey {
        CacheKey {
            path: path.to_path_buf(),
            name: name.to_string(),
            type_name: String::new(),
            offset,
            length,
        }
    }

    #[test]
    fn test_extract_is_byte_exact_for_non_ascii() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Mocks.swift");
        let source = "// héllo wörld\nfunc greet() {}\n";
        std::fs::write(&path, source)?;

        let offset = source.find("func").unwrap();
        let cache = SourceCache::new();
        let text = cache.extract(&key(&path, "greet()", offset, "func greet() {}".len()))?;
        assert_eq!(text, "func greet() {}");

        Ok(())
    }

    #[test]
    fn test_file_is_decoded_once() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Mocks.swift");
        std::fs::write(&path, "abcdefghij")?;

        let cache = SourceCache::new();
        let first = key(&path, "a", 0, 3);
        let second = key(&path, "b", 3, 4);

        assert_eq!(cache.extract(&first)?, "abc");
        assert_eq!(cache.extract(&first)?, "abc");
        assert_eq!(cache.extract(&second)?, "defg");
        assert_eq!(cache.decode_count(), 1);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        Ok(())
    }

    #[test]
    fn test_out_of_range_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Short.swift");
        std::fs::write(&path, "abc")?;

        let cache = SourceCache::new();
        let err = cache.extract(&key(&path, "x", 2, 10)).unwrap_err();
        assert!(matches!(err, Error::ExtractionError(_)));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cache = SourceCache::new();
        let err = cache
            .extract(&key(Path::new("/definitely/not/here.swift"), "x", 0, 1))
            .unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}

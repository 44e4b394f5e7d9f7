//! Content fingerprints (blake3) for change detection.
//!
//! The watcher compares fingerprints rather than mtimes, so a `touch` or a
//! permission change with identical bytes is never treated as an edit.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash an in-memory buffer.
    #[inline]
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Convert to hex string (for debugging/display).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Hash a file's contents, streaming.
///
/// Unlike a cache lookup this surfaces I/O errors: a file that cannot be
/// read has no fingerprint, and callers decide whether to retry.
pub fn fingerprint_file(path: &Path) -> io::Result<ContentHash> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(ContentHash(*hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_matches_buffer_hash() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "# Title\n\nBody\n").unwrap();

        let hash = fingerprint_file(&path).unwrap();
        assert_eq!(hash, ContentHash::of(b"# Title\n\nBody\n"));
    }

    #[test]
    fn test_rewrite_same_content_same_hash() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "same").unwrap();
        let first = fingerprint_file(&path).unwrap();
        fs::write(&path, "same").unwrap();
        assert_eq!(first, fingerprint_file(&path).unwrap());

        fs::write(&path, "different").unwrap();
        assert_ne!(first, fingerprint_file(&path).unwrap());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = fingerprint_file(Path::new("/nonexistent/doc.md")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_display_is_short_hex() {
        let hash = ContentHash::of(b"abc");
        assert_eq!(hash.to_string().len(), 16);
        assert_eq!(hash.to_hex().len(), 64);
    }
}
